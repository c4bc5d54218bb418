//! Structure reconciliation between a local and a canonical collection.
//!
//! Matched entries (by normalized title) have their section lists compared
//! structurally; a mismatch replaces the local list wholesale with the
//! canonical one. Unmatched entries on either side are never touched —
//! this pass upgrades structure, it does not insert or delete songs.

use super::{normalize_title, RepeatSpec, SectionRecord, StandardEntry};

/// Decides whether a local section list should be replaced by the
/// canonical one. Replaceable so the shipped heuristic can be swapped out
/// without touching the batch plumbing.
pub type StructureDecision = fn(&[SectionRecord], &[SectionRecord]) -> bool;

/// The shipped "more structure wins" heuristic.
///
/// A differing section count signals the canonical source captured a
/// structural feature the local copy lacks. When counts match, any
/// pairwise difference in repeat-marker set-ness or value, ending-group
/// presence, or ending-group cardinality also triggers replacement.
/// Coarse on purpose: it can discard intentional local simplifications,
/// which is why it sits behind [`StructureDecision`].
pub fn prefer_richer_structure(local: &[SectionRecord], canonical: &[SectionRecord]) -> bool {
    if local.len() != canonical.len() {
        return true;
    }
    local
        .iter()
        .zip(canonical)
        .any(|(l, c)| section_mismatch(l, c))
}

fn section_mismatch(local: &SectionRecord, canonical: &SectionRecord) -> bool {
    let local_set = local.repeats.as_ref().is_some_and(RepeatSpec::is_set);
    let canonical_set = canonical.repeats.as_ref().is_some_and(RepeatSpec::is_set);
    if local_set != canonical_set || local.repeats != canonical.repeats {
        return true;
    }

    if local.endings.is_some() != canonical.endings.is_some() {
        return true;
    }
    if let (Some(le), Some(ce)) = (&local.endings, &canonical.endings) {
        if le.len() != ce.len() {
            return true;
        }
    }

    false
}

/// Batch reconciler over two parsed collections.
pub struct StructureReconciler {
    decide: StructureDecision,
}

impl StructureReconciler {
    pub fn new() -> Self {
        Self {
            decide: prefer_richer_structure,
        }
    }

    /// Reconciler with a custom replacement decision.
    pub fn with_decision(decide: StructureDecision) -> Self {
        Self { decide }
    }

    /// Upgrade `local` entries in place from `canonical` and return the
    /// number of entries actually modified. Entries without a canonical
    /// match are skipped silently.
    pub fn reconcile(
        &self,
        local: &mut [StandardEntry],
        canonical: &[StandardEntry],
    ) -> usize {
        let mut updated = 0;
        for entry in local.iter_mut() {
            let key = normalize_title(&entry.title);
            let Some(source) = canonical
                .iter()
                .find(|c| normalize_title(&c.title) == key)
            else {
                continue;
            };
            if (self.decide)(&entry.sections, &source.sections) {
                entry.sections = source.sections.clone();
                updated += 1;
            }
        }
        updated
    }
}

impl Default for StructureReconciler {
    fn default() -> Self {
        Self::new()
    }
}
