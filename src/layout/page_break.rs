//! # Page Break Decisions
//!
//! Deciding whether a run of blocks (an entry header and its bullets) moves
//! to the next page as a unit. Individual blocks are never split: `draw_text`
//! measures the whole wrapped block and breaks the page before drawing it.
//! This module only answers the run-level question asked under
//! `BulletListBreak::KeepTogether`.

/// What to do with a run of blocks at the current cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// Draw the run here. Either it fits, or it is taller than a whole page
    /// and would not fit anywhere, so it breaks between blocks as it goes.
    Place,
    /// Move the whole run to the next page.
    MoveToNextPage,
}

/// Given the remaining space on the page, the space on an empty page, and
/// the heights of a run of blocks, decide whether the run moves.
pub fn decide_break(
    remaining_height: f64,
    fresh_page_height: f64,
    child_heights: &[f64],
) -> BreakDecision {
    let total: f64 = child_heights.iter().sum();
    if total <= remaining_height || total > fresh_page_height {
        BreakDecision::Place
    } else {
        BreakDecision::MoveToNextPage
    }
}
