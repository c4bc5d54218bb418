//! Token types for the chord-body tokenizer.

/// A token produced by the tokenizer.
///
/// `raw` is the exact span of input consumed for this token; concatenating
/// the raw spans of every emitted token reconstructs the input string.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub raw: String,
    /// Character offset of the span start in the unscrambled body.
    pub pos: usize,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `|`, `[`, `]` or the `LZ` digraph — any bar boundary.
    Barline,
    /// `Z` — end of the chart.
    FinalBarline,
    /// `*A`, `*B`, … — section boundary; the letter is metadata.
    SectionMark(char),
    /// `{` — start of a repeated block.
    RepeatOpen,
    /// `}` — end of a repeated block.
    RepeatClose,
    /// `N1`, `N2`, … — alternate-ending number.
    EndingMark(u32),
    /// `x` or the `Kcl` escape — play the previous measure again.
    RepeatPreviousMeasure,
    /// A chord symbol, verbatim.
    ChordText(String),
    /// Spacing/layout noise (whitespace, `XyQ`, time signatures, `<..>`
    /// annotations). Zero-width for structure, but carries its raw span.
    FormatHint,
    /// Anything the grammar does not cover. Never an error.
    Unknown(String),
}

impl TokenKind {
    /// Whether this token closes a measure.
    pub fn is_barline(&self) -> bool {
        matches!(self, TokenKind::Barline | TokenKind::FinalBarline)
    }
}
