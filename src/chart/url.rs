//! Chart URL envelope — scheme strip, percent-decode, field split.
//!
//! A chart travels as `scheme://` plus a percent-encoded payload whose
//! fields are joined by `=` in fixed order: Title, Composer, (empty),
//! Style, Key, ChartBody, StyleName, Tempo, RepeatGlobal, trailing empties.

use super::error::DecodeError;

/// Scheme prefixes observed in the wild. The second (older) dialect uses
/// the same envelope with an unscrambled body.
pub const SCHEME_PREFIXES: [&str; 2] = ["irealb://", "irealbook://"];

const FIELD_DELIMITER: char = '=';

/// The ordered field set extracted from a decoded chart URL.
///
/// Positional; missing trailing fields default to the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFields {
    pub title: String,
    pub composer: String,
    pub style: String,
    pub key: String,
    /// Chord body, still scrambled.
    pub chart_body: String,
    pub style_name: String,
    pub tempo: String,
    pub repeat_global: String,
}

/// Decode a chart URL into its field set.
///
/// Fails only when no usable title/body pair exists — everything past the
/// envelope is handled best-effort downstream.
pub fn decode_url(url: &str) -> Result<ChartFields, DecodeError> {
    let payload = strip_scheme(url);
    let decoded = percent_decode(payload);
    let parts: Vec<&str> = decoded.split(FIELD_DELIMITER).collect();

    if parts.len() < 2 {
        return Err(DecodeError::MalformedChartUrl(format!(
            "expected delimited fields, found {}",
            parts.len()
        )));
    }

    let field = |i: usize| parts.get(i).copied().unwrap_or("").to_string();

    let fields = ChartFields {
        title: field(0),
        composer: field(1),
        // index 2 is a reserved empty slot in the payload
        style: field(3),
        key: field(4),
        chart_body: field(5),
        style_name: field(6),
        tempo: field(7),
        repeat_global: field(8),
    };

    if fields.title.trim().is_empty() {
        return Err(DecodeError::MalformedChartUrl("missing title".into()));
    }
    if fields.chart_body.is_empty() {
        return Err(DecodeError::MalformedChartUrl("missing chord body".into()));
    }

    Ok(fields)
}

fn strip_scheme(url: &str) -> &str {
    for prefix in SCHEME_PREFIXES {
        if let Some(rest) = url.strip_prefix(prefix) {
            return rest;
        }
    }
    url
}

/// Percent-decode a payload, byte-accurate and best-effort.
///
/// `%XX` hex pairs become bytes; anything malformed passes through
/// literally. Decoded bytes are reassembled as UTF-8 (lossily, so a bad
/// escape can never abort a decode).
pub fn percent_decode(input: &str) -> String {
    let raw = input.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let hex_pair = (raw[i] == b'%')
            .then(|| {
                let hi = raw.get(i + 1).copied().and_then(hex_val)?;
                let lo = raw.get(i + 2).copied().and_then(hex_val)?;
                Some(hi * 16 + lo)
            })
            .flatten();

        match hex_pair {
            Some(b) => {
                bytes.push(b);
                i += 3;
            }
            None => {
                bytes.push(raw[i]);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_basic_fields() {
        let url = "irealb://My%20Song=Composer%20Name==Swing=C=T44C%7CZ=Medium=120=0";
        let fields = decode_url(url).unwrap();
        assert_eq!(fields.title, "My Song");
        assert_eq!(fields.composer, "Composer Name");
        assert_eq!(fields.style, "Swing");
        assert_eq!(fields.key, "C");
        assert_eq!(fields.chart_body, "T44C|Z");
        assert_eq!(fields.style_name, "Medium");
        assert_eq!(fields.tempo, "120");
        assert_eq!(fields.repeat_global, "0");
    }

    #[test]
    fn missing_trailing_fields_default_empty() {
        let fields = decode_url("irealb://Tune====C=C%7CZ").unwrap();
        assert_eq!(fields.tempo, "");
        assert_eq!(fields.repeat_global, "");
        assert_eq!(fields.chart_body, "C|Z");
    }

    #[test]
    fn no_delimiters_is_malformed() {
        let err = decode_url("irealb://just-a-title").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedChartUrl(_)));
    }

    #[test]
    fn empty_title_is_malformed() {
        let err = decode_url("irealb://=Composer===C=C%7CZ").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedChartUrl(_)));
    }

    #[test]
    fn empty_body_is_malformed() {
        let err = decode_url("irealb://Tune=Composer==Swing=C=").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedChartUrl(_)));
    }

    #[test]
    fn unknown_scheme_passes_through() {
        // Payload without a recognized scheme still splits on '='.
        let fields = decode_url("Tune====C=C%7CZ").unwrap();
        assert_eq!(fields.title, "Tune");
    }

    #[test]
    fn percent_decode_hex_pairs() {
        assert_eq!(percent_decode("A%20B%3D"), "A B=");
        assert_eq!(percent_decode("%7C%7c"), "||");
    }

    #[test]
    fn percent_decode_utf8_sequence() {
        assert_eq!(percent_decode("caf%C3%A9"), "café");
    }

    #[test]
    fn percent_decode_malformed_passes_through() {
        assert_eq!(percent_decode("50%"), "50%");
        assert_eq!(percent_decode("50%ZZ"), "50%ZZ");
    }
}
