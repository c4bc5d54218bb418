//! The chord-body obfuscation transform and its inverse.
//!
//! The source format scrambles the chord body in fixed-length runs: the
//! body is walked in 50-character runs, and a run is permuted only while
//! at least [`MIN_TAIL`] characters remain after it — the trailing
//! remainder always passes through verbatim. The permutation itself is a
//! fixed table of index swaps, which makes the transform an involution:
//! scrambling and unscrambling are the same operation.
//!
//! This never fails. A body that does not line up with run boundaries
//! still produces output; downstream tokenization classifies any
//! resulting noise as `Unknown` instead of erroring.

/// Length of one scrambled run.
pub const RUN_LEN: usize = 50;

/// A run is permuted only when at least this many characters follow it.
pub const MIN_TAIL: usize = 2;

/// Marker prefixed to a scrambled chord body by the source format.
pub const SCRAMBLED_MARKER: &str = "1r34LbKcu7";

/// Index swaps applied to each full run, expressed as (i, RUN_LEN-1-i)
/// pairs: the outer 5 characters and the inner 10..24 band are mirrored.
fn swap_pairs() -> impl Iterator<Item = (usize, usize)> {
    (0..5).chain(10..24).map(|i| (i, RUN_LEN - 1 - i))
}

/// Invert the obfuscation of a chord body. Involutive, so this is also
/// the forward transform (see [`scramble`]).
pub fn unscramble(body: &str) -> String {
    let mut chars: Vec<char> = body.chars().collect();
    let mut start = 0;

    while chars.len() - start >= RUN_LEN + MIN_TAIL {
        permute_run(&mut chars[start..start + RUN_LEN]);
        start += RUN_LEN;
    }

    chars.into_iter().collect()
}

/// Apply the forward obfuscation. Same permutation as [`unscramble`];
/// kept as a distinct name so call sites say what they mean.
pub fn scramble(body: &str) -> String {
    unscramble(body)
}

fn permute_run(run: &mut [char]) {
    for (a, b) in swap_pairs() {
        run.swap(a, b);
    }
}

/// Strip the scrambled-body marker, returning the remainder and whether
/// the marker was present.
pub fn strip_marker(body: &str) -> (&str, bool) {
    match body.strip_prefix(SCRAMBLED_MARKER) {
        Some(rest) => (rest, true),
        None => (body, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of_len(n: usize) -> String {
        (0..n)
            .map(|i| char::from(b'A' + (i % 26) as u8))
            .collect()
    }

    #[test]
    fn round_trip_empty() {
        assert_eq!(scramble(&unscramble("")), "");
    }

    #[test]
    fn round_trip_shorter_than_run() {
        let body = body_of_len(RUN_LEN - 1);
        assert_eq!(scramble(&unscramble(&body)), body);
        // Too short to permute at all: passes through unchanged.
        assert_eq!(unscramble(&body), body);
    }

    #[test]
    fn round_trip_exactly_one_run() {
        // One run with no tail is left verbatim (tail rule).
        let body = body_of_len(RUN_LEN);
        assert_eq!(unscramble(&body), body);
    }

    #[test]
    fn round_trip_multiple_runs_with_remainder() {
        let body = body_of_len(RUN_LEN * 3 + 7);
        let scrambled = scramble(&body);
        assert_ne!(scrambled, body);
        assert_eq!(unscramble(&scrambled), body);
        assert_eq!(scramble(&unscramble(&scrambled)), scrambled);
    }

    #[test]
    fn run_permutation_is_involution() {
        let body = body_of_len(RUN_LEN + MIN_TAIL);
        assert_eq!(unscramble(&unscramble(&body)), body);
    }

    #[test]
    fn remainder_is_untouched() {
        let body = body_of_len(RUN_LEN + 10);
        let out = unscramble(&body);
        assert_eq!(&out[RUN_LEN..], &body[RUN_LEN..]);
    }

    #[test]
    fn marker_stripping() {
        let tagged = format!("{SCRAMBLED_MARKER}abc");
        assert_eq!(strip_marker(&tagged), ("abc", true));
        assert_eq!(strip_marker("abc"), ("abc", false));
    }

    #[test]
    fn deterministic() {
        let body = body_of_len(123);
        assert_eq!(unscramble(&body), unscramble(&body));
    }
}
