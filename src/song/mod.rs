//! Song domain model — sections, measures, endings.
//!
//! A [`Song`] is produced once per decode and is read-only afterwards.
//! Section identity is positional; the symbol marker a chart attaches to a
//! section (`*A`, `*B`, …) is carried as metadata only.

/// A measure: the chords played between two barlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measure {
    pub chords: Vec<String>,
}

impl Measure {
    pub fn new(chords: Vec<String>) -> Self {
        Self { chords }
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }
}

/// An alternate ending: measures played only on the numbered pass through
/// a repeated section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ending {
    pub number: u32,
    pub measures: Vec<Measure>,
}

/// A structural block of a tune's form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section letter from the chart (`A`, `B`, …), metadata only.
    pub label: Option<char>,
    pub measures: Vec<Measure>,
    /// How many times the section is played. Always >= 1; 1 means "once".
    pub repeats: u32,
    pub endings: Vec<Ending>,
}

impl Section {
    pub fn new() -> Self {
        Self {
            label: None,
            measures: Vec::new(),
            repeats: 1,
            endings: Vec::new(),
        }
    }

    /// A section with no measures, no endings, and no pending repeat.
    pub fn is_empty(&self) -> bool {
        self.measures.is_empty() && self.endings.is_empty()
    }

    fn ending(&self, number: u32) -> Option<&Ending> {
        self.endings.iter().find(|e| e.number == number)
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoded lead sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub title: String,
    pub composer: String,
    pub style: String,
    pub key: String,
    /// Tempo as it appeared in the chart URL, verbatim.
    pub tempo: String,
    pub sections: Vec<Section>,
}

impl Song {
    /// Total measure count before repeat/ending expansion.
    pub fn measure_count(&self) -> usize {
        self.sections.iter().map(|s| s.measures.len()).sum()
    }

    /// Expand the form into performance order: each section played
    /// `repeats` times, with ending `n` appended on pass `n` when present.
    pub fn performance_measures(&self) -> Vec<&Measure> {
        let mut out = Vec::new();
        for section in &self.sections {
            for pass in 1..=section.repeats {
                out.extend(section.measures.iter());
                if let Some(ending) = section.ending(pass) {
                    out.extend(ending.measures.iter());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure(chord: &str) -> Measure {
        Measure::new(vec![chord.to_string()])
    }

    fn song_with(sections: Vec<Section>) -> Song {
        Song {
            title: "Test".to_string(),
            composer: String::new(),
            style: String::new(),
            key: "C".to_string(),
            tempo: String::new(),
            sections,
        }
    }

    #[test]
    fn measure_count_sums_sections() {
        let mut a = Section::new();
        a.measures = vec![measure("C"), measure("F")];
        let mut b = Section::new();
        b.measures = vec![measure("G7")];
        let song = song_with(vec![a, b]);
        assert_eq!(song.measure_count(), 3);
    }

    #[test]
    fn performance_order_expands_repeats() {
        let mut a = Section::new();
        a.measures = vec![measure("C"), measure("F")];
        a.repeats = 2;
        let song = song_with(vec![a]);
        let chords: Vec<&str> = song
            .performance_measures()
            .iter()
            .map(|m| m.chords[0].as_str())
            .collect();
        assert_eq!(chords, vec!["C", "F", "C", "F"]);
    }

    #[test]
    fn performance_order_selects_ending_per_pass() {
        let mut a = Section::new();
        a.measures = vec![measure("C")];
        a.repeats = 2;
        a.endings = vec![
            Ending {
                number: 1,
                measures: vec![measure("G7")],
            },
            Ending {
                number: 2,
                measures: vec![measure("C6")],
            },
        ];
        let song = song_with(vec![a]);
        let chords: Vec<&str> = song
            .performance_measures()
            .iter()
            .map(|m| m.chords[0].as_str())
            .collect();
        assert_eq!(chords, vec!["C", "G7", "C", "C6"]);
    }

    #[test]
    fn missing_ending_pass_plays_base_only() {
        let mut a = Section::new();
        a.measures = vec![measure("D-7")];
        a.repeats = 3;
        a.endings = vec![Ending {
            number: 2,
            measures: vec![measure("A7")],
        }];
        let song = song_with(vec![a]);
        assert_eq!(song.performance_measures().len(), 4);
    }
}
