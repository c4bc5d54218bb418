//! Chart builder — token stream to song structure.
//!
//! An explicit state machine over the token stream: an open measure
//! accumulator, a current-section draft, and a redirect target that is
//! either the section body or a numbered alternate ending. The builder
//! never fails; a body with zero recognizable tokens still yields a song
//! with one empty section so that chart metadata survives corruption.

use super::token::{Token, TokenKind};
use crate::song::{Ending, Measure, Section};

/// Repeat count a bracket gets when the chart gives no explicit number.
pub const DEFAULT_REPEATS: u32 = 2;

/// Where closed measures currently land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Body,
    Ending(u32),
}

/// The structural result of one build pass.
#[derive(Debug, Clone)]
pub struct BuiltChart {
    pub sections: Vec<Section>,
    /// Count of tokens the grammar did not recognize. Diagnostic only.
    pub unknown_tokens: usize,
}

pub struct ChartBuilder {
    sections: Vec<Section>,
    current: Section,
    open_measure: Vec<String>,
    target: Target,
    bracket_depth: u32,
    last_closed: Option<Measure>,
    unknown_tokens: usize,
}

impl ChartBuilder {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            current: Section::new(),
            open_measure: Vec::new(),
            target: Target::Body,
            bracket_depth: 0,
            last_closed: None,
            unknown_tokens: 0,
        }
    }

    /// Consume an entire token stream.
    pub fn build(tokens: impl IntoIterator<Item = Token>) -> BuiltChart {
        let mut builder = Self::new();
        for token in tokens {
            builder.push(&token);
        }
        builder.finish()
    }

    /// Feed one token into the state machine.
    pub fn push(&mut self, token: &Token) {
        match &token.kind {
            TokenKind::ChordText(chord) => {
                self.open_measure.push(chord.clone());
            }
            TokenKind::Barline | TokenKind::FinalBarline => {
                self.close_measure();
            }
            TokenKind::RepeatOpen => {
                self.bracket_depth += 1;
            }
            TokenKind::RepeatClose => {
                self.close_measure();
                self.current.repeats = DEFAULT_REPEATS;
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
            }
            TokenKind::SectionMark(symbol) => {
                self.close_measure();
                self.flush_section(Some(*symbol));
            }
            TokenKind::EndingMark(number) => {
                self.close_measure();
                self.target = Target::Ending(*number);
                self.ensure_ending(*number);
            }
            TokenKind::RepeatPreviousMeasure => {
                if let Some(prev) = self.last_closed.clone() {
                    self.push_measure(prev);
                }
            }
            TokenKind::Unknown(_) => {
                self.unknown_tokens += 1;
            }
            TokenKind::FormatHint => {}
        }
    }

    /// Flush all open state and return the built structure.
    pub fn finish(mut self) -> BuiltChart {
        self.close_measure();
        self.flush_section(None);
        if self.sections.is_empty() {
            self.sections.push(Section::new());
        }
        BuiltChart {
            sections: self.sections,
            unknown_tokens: self.unknown_tokens,
        }
    }

    /// Close the open measure, if it holds any chords, into the current
    /// redirect target. Layout barlines over an empty accumulator are
    /// no-ops so double bars never produce empty measures.
    fn close_measure(&mut self) {
        if self.open_measure.is_empty() {
            return;
        }
        let measure = Measure::new(std::mem::take(&mut self.open_measure));
        self.push_measure(measure);
    }

    fn push_measure(&mut self, measure: Measure) {
        self.last_closed = Some(measure.clone());
        match self.target {
            Target::Body => self.current.measures.push(measure),
            Target::Ending(n) => {
                self.ensure_ending(n);
                if let Some(ending) =
                    self.current.endings.iter_mut().find(|e| e.number == n)
                {
                    ending.measures.push(measure);
                }
            }
        }
    }

    fn ensure_ending(&mut self, number: u32) {
        if !self.current.endings.iter().any(|e| e.number == number) {
            self.current.endings.push(Ending {
                number,
                measures: Vec::new(),
            });
        }
    }

    /// Close the current section and start a new one with the given label.
    /// A bracket left open at a boundary still earns its default repeat.
    fn flush_section(&mut self, next_label: Option<char>) {
        if self.bracket_depth > 0 {
            self.current.repeats = DEFAULT_REPEATS;
            self.bracket_depth = 0;
        }
        self.target = Target::Body;

        if self.current.is_empty() {
            // Nothing accumulated yet: adopt the label in place.
            if next_label.is_some() {
                self.current.label = next_label;
            }
            return;
        }

        let finished = std::mem::take(&mut self.current);
        self.sections.push(finished);
        self.current.label = next_label;
    }
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self::new()
    }
}
