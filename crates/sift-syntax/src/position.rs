//! Shared position conversion helpers.
//!
//! Tree-sitter positions are zero-based. Results and diagnostics report
//! one-based line and column numbers.

use sift_core::{LineCol, Location};

/// Converts a Tree-sitter position (0-based) to one-based display coordinates.
#[must_use]
pub(crate) fn point_to_one_based(pos: tree_sitter::Point) -> (u32, u32) {
    // Line/column numbers will realistically never exceed u32::MAX.
    let line = u32::try_from(pos.row.saturating_add(1)).unwrap_or(u32::MAX);
    let column = u32::try_from(pos.column.saturating_add(1)).unwrap_or(u32::MAX);
    (line, column)
}

/// Builds the one-based [`Location`] of a node.
#[must_use]
pub fn node_location(node: tree_sitter::Node<'_>) -> Location {
    let (start_line, start_column) = point_to_one_based(node.start_position());
    let (end_line, end_column) = point_to_one_based(node.end_position());
    Location::new(
        node.start_byte(),
        node.end_byte(),
        LineCol::new(start_line, start_column),
        LineCol::new(end_line, end_column),
    )
}
