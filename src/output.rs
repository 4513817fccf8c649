//! CLI output formatting.
//!
//! # Entity Display Contract
//!
//! Every step of a run prints a header line naming what happened, followed by
//! indented context lines, one per image:
//!
//! ```text
//! Initial layout: horizontal, 2 images → 1000x300
//!     001 dawn.jpg 800x600 → 400x300 at (0, 0)
//!     002 pier.png 400x200 → 600x300 at (400, 0)
//! After resize to 400x150: horizontal, 2 images → 500x150
//!     001 dawn.jpg 800x600 → 200x150 at (0, 0)
//!     002 pier.png 400x200 → 300x150 at (200, 0)
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` for testability and has a
//! `print_*` wrapper that writes to stdout. Format functions are pure: no I/O,
//! no side effects.

use crate::compositing::{Layout, RenderOutcome};
use crate::types::{LayoutMode, Size};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Whole pixels print bare; fractional ones keep two decimals.
fn px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Surface a layout asks for, as `WxH`.
///
/// Computed in `f64` so layouts too large for a `u32` surface still print.
fn requested_surface(layout: &Layout) -> String {
    let main = layout.main_extent.ceil();
    let cross = layout.cross_axis;
    match layout.mode {
        LayoutMode::Horizontal => format!("{main:.0}x{cross}"),
        LayoutMode::Vertical => format!("{cross}x{main:.0}"),
    }
}

/// One labelled input image: display name plus intrinsic size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLabel {
    pub name: String,
    pub size: Size,
}

/// Format a computed layout under a step header.
///
/// `labels` is indexed by each placement's sequence index.
pub fn format_layout(step: &str, layout: &Layout, labels: &[ImageLabel]) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {}, {} → {}",
        step,
        layout.mode,
        plural(layout.placements.len(), "image"),
        requested_surface(layout)
    )];

    for (pos, p) in layout.placements.iter().enumerate() {
        let (name, intrinsic) = labels
            .get(p.index)
            .map(|l| (l.name.as_str(), l.size.to_string()))
            .unwrap_or(("?", "?".to_string()));
        lines.push(format!(
            "{}{} {} {} → {}x{} at ({}, {})",
            indent(1),
            format_index(pos + 1),
            name,
            intrinsic,
            px(p.width),
            px(p.height),
            px(p.x),
            px(p.y)
        ));
    }
    lines
}

/// Format the outcome of one render-triggering step.
///
/// `surface` is the surface size after the step, used for non-drawing outcomes.
pub fn format_outcome(
    step: &str,
    outcome: &RenderOutcome,
    surface: Size,
    labels: &[ImageLabel],
) -> Vec<String> {
    match outcome {
        RenderOutcome::Drawn(layout) => format_layout(step, layout, labels),
        RenderOutcome::Cleared => vec![format!("{step}: cleared → {surface}")],
        RenderOutcome::Unchanged => vec![format!("{step}: unchanged ({surface})")],
        RenderOutcome::TooLarge(layout) => vec![format!(
            "{step}: too large, {} needed for {} (left blank at {surface})",
            requested_surface(layout),
            plural(layout.placements.len(), "image")
        )],
    }
}

pub fn print_outcome(step: &str, outcome: &RenderOutcome, surface: Size, labels: &[ImageLabel]) {
    for line in format_outcome(step, outcome, surface, labels) {
        println!("{}", line);
    }
}

/// Result of checking one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    Ok(Size),
    Failed(String),
}

/// Format the `check` command report.
///
/// ```text
/// 001 dawn.jpg
///     Size: 800x600
/// 002 notes.txt
///     Error: Failed to decode notes.txt: ...
///
/// 1 of 2 inputs decoded
/// ```
pub fn format_check(results: &[(String, CheckResult)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (name, result)) in results.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), name));
        match result {
            CheckResult::Ok(size) => lines.push(format!("{}Size: {}", indent(1), size)),
            CheckResult::Failed(err) => lines.push(format!("{}Error: {}", indent(1), err)),
        }
    }
    let ok = results
        .iter()
        .filter(|(_, r)| matches!(r, CheckResult::Ok(_)))
        .count();
    lines.push(String::new());
    lines.push(format!("{} of {} decoded", ok, plural(results.len(), "input")));
    lines
}

pub fn print_check(results: &[(String, CheckResult)]) {
    for line in format_check(results) {
        println!("{}", line);
    }
}
