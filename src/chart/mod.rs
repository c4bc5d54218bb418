//! Chart decoding — URL envelope → unscrambled body → tokens → song.

pub mod builder;
pub mod error;
pub mod lexer;
pub mod scramble;
pub mod token;
pub mod url;

pub use builder::{BuiltChart, ChartBuilder, DEFAULT_REPEATS};
pub use error::DecodeError;
pub use token::{Token, TokenKind};
pub use url::ChartFields;

use crate::song::Song;

/// The result of decoding one chart URL.
#[derive(Debug, Clone)]
pub struct DecodedChart {
    pub song: Song,
    /// Tokens the grammar did not recognize. Diagnostic only; a nonzero
    /// count never fails a decode.
    pub unknown_tokens: usize,
}

/// The chart decoder.
///
/// Runs the full pipeline: envelope decode, marker-gated unscramble,
/// tokenize, build. Only the envelope can fail.
pub struct ChartDecoder;

impl ChartDecoder {
    /// Decode a chart URL into a [`Song`].
    pub fn decode(chart_url: &str) -> Result<DecodedChart, DecodeError> {
        let fields = url::decode_url(chart_url)?;
        let body = Self::unscramble_body(&fields.chart_body);
        let built = ChartBuilder::build(lexer::tokenize(&body));

        Ok(DecodedChart {
            song: Song {
                title: fields.title,
                composer: fields.composer,
                style: fields.style,
                key: fields.key,
                tempo: fields.tempo,
                sections: built.sections,
            },
            unknown_tokens: built.unknown_tokens,
        })
    }

    /// Recover the plain chord body from a body field. Bodies carrying the
    /// scrambled-body marker are unscrambled; anything else (the older
    /// plain dialect) passes through verbatim.
    pub fn unscramble_body(chart_body: &str) -> String {
        let (body, scrambled) = scramble::strip_marker(chart_body);
        if scrambled {
            scramble::unscramble(body)
        } else {
            body.to_string()
        }
    }
}
