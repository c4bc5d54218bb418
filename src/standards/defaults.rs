//! Playback defaults normalization.

use super::StandardEntry;

/// Baseline loop count applied to entries with no playback default.
pub const DEFAULT_LOOPS: u32 = 2;

/// Fills the missing per-song playback default. Idempotent: anything with
/// a positive loop count is left alone, so repeated runs converge.
pub struct DefaultsNormalizer;

impl DefaultsNormalizer {
    /// Normalize in place; returns how many entries were updated.
    pub fn normalize(entries: &mut [StandardEntry]) -> usize {
        let mut updated = 0;
        for entry in entries.iter_mut() {
            match entry.default_loops {
                None | Some(0) => {
                    entry.default_loops = Some(DEFAULT_LOOPS);
                    updated += 1;
                }
                Some(_) => {}
            }
        }
        updated
    }
}
