//! Source positions for matched nodes.

use serde::{Deserialize, Serialize};

/// A one-based line and column position within a source file.
///
/// # Example
///
/// ```
/// use sift_core::LineCol;
///
/// let pos = LineCol::new(10, 4);
/// assert_eq!(pos.line(), 10);
/// assert_eq!(pos.column(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCol {
    /// One-based line number.
    pub line: u32,
    /// One-based column number (byte offset within the line plus one).
    pub column: u32,
}

impl LineCol {
    /// Creates a new line/column position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Returns the one-based line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the one-based column number.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// The byte range and line/column span of a matched node.
///
/// The byte range is half-open: `start_byte` is inclusive and `end_byte` is
/// exclusive.
///
/// # Example
///
/// ```
/// use sift_core::{LineCol, Location};
///
/// let outer = Location::new(0, 40, LineCol::new(1, 1), LineCol::new(3, 2));
/// let inner = Location::new(10, 20, LineCol::new(2, 5), LineCol::new(2, 15));
/// assert!(outer.contains(&inner));
/// assert!(!inner.contains(&outer));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Start byte offset (inclusive).
    pub start_byte: usize,
    /// End byte offset (exclusive).
    pub end_byte: usize,
    /// Start position as line and column.
    pub start: LineCol,
    /// End position as line and column.
    pub end: LineCol,
}

impl Location {
    /// Creates a new location from byte offsets and line/column positions.
    #[must_use]
    pub const fn new(start_byte: usize, end_byte: usize, start: LineCol, end: LineCol) -> Self {
        Self {
            start_byte,
            end_byte,
            start,
            end,
        }
    }

    /// Returns the inclusive start byte offset.
    #[must_use]
    pub const fn start_byte(&self) -> usize {
        self.start_byte
    }

    /// Returns the exclusive end byte offset.
    #[must_use]
    pub const fn end_byte(&self) -> usize {
        self.end_byte
    }

    /// Returns the start line/column position.
    #[must_use]
    pub const fn start(&self) -> &LineCol {
        &self.start
    }

    /// Returns the end line/column position.
    #[must_use]
    pub const fn end(&self) -> &LineCol {
        &self.end
    }

    /// Returns whether `other` lies entirely within this byte range.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        other.start_byte >= self.start_byte && other.end_byte <= self.end_byte
    }
}
