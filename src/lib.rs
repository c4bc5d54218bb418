//! Chartbook — decoder and reconciliation engine for iReal-style chart URLs.

pub mod chart;
pub mod song;
pub mod standards;
