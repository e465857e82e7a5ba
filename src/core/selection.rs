//! Selection geometry
//!
//! A selection is an anchor/focus pair owned by the UI layer. This module
//! only derives geometry from it: ordered bounds and the highlighted column
//! span of each row. Spans are end-exclusive at the trailing endpoint, so
//! the caret cell itself is never highlighted.

use serde::{Deserialize, Serialize};

/// A position in the terminal grid, stamped with when it was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionPoint {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub column: usize,
    /// Breaks ties between points at the same cell
    pub timestamp: u64,
}

impl SelectionPoint {
    pub fn new(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            timestamp: 0,
        }
    }

    pub fn at(row: usize, column: usize, timestamp: u64) -> Self {
        Self {
            row,
            column,
            timestamp,
        }
    }

    fn sort_key(&self) -> (usize, usize, u64) {
        (self.row, self.column, self.timestamp)
    }
}

/// Selection shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    /// Reading-order selection that wraps across rows
    #[default]
    Normal,
    /// Block selection with the same column span on every row
    Rectangular,
}

/// Whether the pointer is still moving the focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    #[default]
    Idle,
    Dragging,
}

/// A text selection in the terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalSelection {
    /// Where the selection started
    pub anchor: SelectionPoint,
    /// Where the selection currently ends
    pub focus: SelectionPoint,
    pub kind: SelectionKind,
    pub status: SelectionStatus,
}

/// Ordered corners of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionBounds {
    pub top_left: SelectionPoint,
    pub bottom_right: SelectionPoint,
}

/// Highlighted columns of one row, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSegment {
    pub row: usize,
    pub start_column: usize,
    pub end_column: usize,
}

impl TerminalSelection {
    /// Create an idle selection between two points
    pub fn new(anchor: SelectionPoint, focus: SelectionPoint, kind: SelectionKind) -> Self {
        Self {
            anchor,
            focus,
            kind,
            status: SelectionStatus::Idle,
        }
    }

    /// Start a drag at `anchor`; the focus follows with [`update`](Self::update)
    pub fn start(anchor: SelectionPoint, kind: SelectionKind) -> Self {
        Self {
            anchor,
            focus: anchor,
            kind,
            status: SelectionStatus::Dragging,
        }
    }

    /// Move the focus
    pub fn update(&mut self, focus: SelectionPoint) {
        self.focus = focus;
    }

    /// Finish the drag
    pub fn finish(&mut self) {
        self.status = SelectionStatus::Idle;
    }

    /// Ordered corners.
    ///
    /// Normal selections order the endpoints by (row, column, timestamp).
    /// Rectangular selections take the row and column extremes independently.
    pub fn bounds(&self) -> SelectionBounds {
        let (a, f) = (self.anchor, self.focus);
        match self.kind {
            SelectionKind::Normal => {
                if a.sort_key() <= f.sort_key() {
                    SelectionBounds {
                        top_left: a,
                        bottom_right: f,
                    }
                } else {
                    SelectionBounds {
                        top_left: f,
                        bottom_right: a,
                    }
                }
            }
            SelectionKind::Rectangular => SelectionBounds {
                top_left: SelectionPoint::at(
                    a.row.min(f.row),
                    a.column.min(f.column),
                    a.timestamp.min(f.timestamp),
                ),
                bottom_right: SelectionPoint::at(
                    a.row.max(f.row),
                    a.column.max(f.column),
                    a.timestamp.max(f.timestamp),
                ),
            },
        }
    }

    /// Highlighted span of `row`, or `None` if the row is outside the
    /// selection or its span is empty
    pub fn row_segment(&self, row: usize, columns: usize) -> Option<RowSegment> {
        if columns == 0 {
            return None;
        }
        let SelectionBounds {
            top_left,
            bottom_right,
        } = self.bounds();
        if row < top_left.row || row > bottom_right.row {
            return None;
        }

        let (start, end_exclusive) = match self.kind {
            SelectionKind::Normal => {
                let start = if row == top_left.row { top_left.column } else { 0 };
                let end = if row == bottom_right.row {
                    bottom_right.column
                } else {
                    columns
                };
                (start, end)
            }
            SelectionKind::Rectangular => (top_left.column, bottom_right.column),
        };

        let last = columns - 1;
        let end_exclusive = end_exclusive.min(columns);
        if end_exclusive == 0 || start.min(last) > end_exclusive - 1 {
            return None;
        }

        Some(RowSegment {
            row,
            start_column: start.min(last),
            end_column: end_exclusive - 1,
        })
    }

    /// Spans of every row in the selection, top to bottom
    pub fn row_segments(&self, columns: usize) -> Vec<RowSegment> {
        let bounds = self.bounds();
        (bounds.top_left.row..=bounds.bottom_right.row)
            .filter_map(|row| self.row_segment(row, columns))
            .collect()
    }

    /// True when both corners land on the same cell
    pub fn is_collapsed(&self) -> bool {
        let SelectionBounds {
            top_left,
            bottom_right,
        } = self.bounds();
        top_left.row == bottom_right.row && top_left.column == bottom_right.column
    }
}
