// Resume version comparison.
// Implements: tree diff, per-section change summary, policy-driven merge.
// Lists of identified entries are matched by id in both diff and merge.

pub mod diff;
pub mod handlers;
pub mod merge;
pub mod summary;
