//! Tokenizer for the unscrambled chord body.
//!
//! Single forward pass, no backtracking, and it never fails: the format is
//! only partially documented, so anything outside the grammar is emitted as
//! [`TokenKind::Unknown`] rather than an error. The grammar itself is data:
//! a single-character symbol table plus a short ordered list of
//! multi-character patterns.
//!
//! Every consumed character lands in exactly one emitted token's `raw`
//! span, so concatenating the spans reconstructs the input.

use super::token::{Token, TokenKind};

/// Multi-character escape patterns, tried in order before anything else.
/// `LZ` is a barline digraph, `Kcl` repeats the previous measure, `XyQ`
/// is cell-spacing noise.
const ESCAPE_PATTERNS: [(&str, TokenKind); 3] = [
    ("LZ", TokenKind::Barline),
    ("Kcl", TokenKind::RepeatPreviousMeasure),
    ("XyQ", TokenKind::FormatHint),
];

/// Prefix introducing a numbered alternate ending.
const ENDING_PREFIX: char = 'N';

/// Prefix introducing a two-digit time signature hint.
const TIME_SIG_PREFIX: char = 'T';

fn single_symbol(c: char) -> Option<TokenKind> {
    match c {
        '|' | '[' | ']' => Some(TokenKind::Barline),
        'Z' => Some(TokenKind::FinalBarline),
        '{' => Some(TokenKind::RepeatOpen),
        '}' => Some(TokenKind::RepeatClose),
        'x' => Some(TokenKind::RepeatPreviousMeasure),
        _ => None,
    }
}

/// A lazy, non-restartable token stream over one chord body.
pub struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
}

/// Tokenize an unscrambled chord body.
pub fn tokenize(body: &str) -> Tokenizer {
    Tokenizer {
        chars: body.chars().collect(),
        pos: 0,
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.chars.len() {
            return None;
        }

        let start = self.pos;
        let c = self.chars[self.pos];

        if let Some(kind) = single_symbol(c) {
            self.pos += 1;
            return Some(self.emit(kind, start));
        }

        if let Some((pat, kind)) = self.escape_at(self.pos) {
            self.pos += pat.chars().count();
            return Some(self.emit(kind, start));
        }

        if c == '*' {
            return Some(self.lex_section_mark(start));
        }

        if c == ENDING_PREFIX && self.digit_at(self.pos + 1) {
            return Some(self.lex_ending_mark(start));
        }

        if c == TIME_SIG_PREFIX && self.digit_at(self.pos + 1) && self.digit_at(self.pos + 2) {
            self.pos += 3;
            return Some(self.emit(TokenKind::FormatHint, start));
        }

        if c == '<' {
            return Some(self.lex_annotation(start));
        }

        if is_spacing(c) {
            while self.pos < self.chars.len() && is_spacing(self.chars[self.pos]) {
                self.pos += 1;
            }
            return Some(self.emit(TokenKind::FormatHint, start));
        }

        Some(self.lex_text_run(start))
    }
}

impl Tokenizer {
    fn emit(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            raw: self.chars[start..self.pos].iter().collect(),
            pos: start,
        }
    }

    fn digit_at(&self, i: usize) -> bool {
        self.chars.get(i).is_some_and(|c| c.is_ascii_digit())
    }

    fn escape_at(&self, i: usize) -> Option<(&'static str, TokenKind)> {
        for (pat, kind) in ESCAPE_PATTERNS {
            if self.matches_at(i, pat) {
                return Some((pat, kind));
            }
        }
        None
    }

    fn matches_at(&self, i: usize, pat: &str) -> bool {
        pat.chars()
            .enumerate()
            .all(|(k, pc)| self.chars.get(i + k) == Some(&pc))
    }

    /// `*` plus one marker character. A trailing bare `*` is Unknown.
    fn lex_section_mark(&mut self, start: usize) -> Token {
        self.pos += 1;
        match self.chars.get(self.pos).copied() {
            Some(symbol) => {
                self.pos += 1;
                self.emit(TokenKind::SectionMark(symbol), start)
            }
            None => self.emit(TokenKind::Unknown("*".to_string()), start),
        }
    }

    /// `N` plus digits. Out-of-range numbers degrade to Unknown.
    fn lex_ending_mark(&mut self, start: usize) -> Token {
        self.pos += 1;
        let digits_start = self.pos;
        while self.digit_at(self.pos) {
            self.pos += 1;
        }
        let digits: String = self.chars[digits_start..self.pos].iter().collect();
        match digits.parse::<u32>() {
            Ok(n) => self.emit(TokenKind::EndingMark(n), start),
            Err(_) => {
                let raw: String = self.chars[start..self.pos].iter().collect();
                self.emit(TokenKind::Unknown(raw), start)
            }
        }
    }

    /// `<...>` text annotation, swallowed whole. An unclosed annotation
    /// runs to end of input.
    fn lex_annotation(&mut self, start: usize) -> Token {
        self.pos += 1;
        while self.pos < self.chars.len() && self.chars[self.pos] != '>' {
            self.pos += 1;
        }
        if self.pos < self.chars.len() {
            self.pos += 1; // consume '>'
        }
        self.emit(TokenKind::FormatHint, start)
    }

    /// Accumulate a text run up to the next symbol boundary, then decide
    /// whether it reads as a chord.
    fn lex_text_run(&mut self, start: usize) -> Token {
        self.pos += 1;
        while self.pos < self.chars.len() && !self.is_boundary(self.pos) {
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        let kind = if is_chord_like(&raw) {
            TokenKind::ChordText(raw.clone())
        } else {
            TokenKind::Unknown(raw.clone())
        };
        Token {
            kind,
            raw,
            pos: start,
        }
    }

    fn is_boundary(&self, i: usize) -> bool {
        let c = self.chars[i];
        if single_symbol(c).is_some() || is_spacing(c) || c == '<' || c == '*' {
            return true;
        }
        if self.escape_at(i).is_some() {
            return true;
        }
        if c == ENDING_PREFIX && self.digit_at(i + 1) {
            return true;
        }
        if c == TIME_SIG_PREFIX && self.digit_at(i + 1) && self.digit_at(i + 2) {
            return true;
        }
        false
    }
}

fn is_spacing(c: char) -> bool {
    c.is_whitespace() || c == ','
}

/// Whether a text run reads as a chord symbol: a root letter, the
/// no-chord glyph `n`, the slash-cell glyph `p`, or the `W` root
/// placeholder.
fn is_chord_like(run: &str) -> bool {
    matches!(run.chars().next(), Some('A'..='G' | 'n' | 'p' | 'W'))
}
