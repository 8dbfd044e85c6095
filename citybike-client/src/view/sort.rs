//! Column sort state for the journey listing.

use crate::journeys::{SortColumn, SortOrder, sort_segment};

/// Which column is sorted and in which direction.
///
/// Clicking a column flips its direction and makes it the sorted column;
/// every other column goes back to ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    sorted: Option<SortColumn>,
    descending: [bool; 4],
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&mut self, column: SortColumn) {
        let flipped = !self.descending[column.index()];
        self.descending = [false; 4];
        self.descending[column.index()] = flipped;
        self.sorted = Some(column);
    }

    /// Current order, or `None` when nothing has been clicked.
    pub fn order(&self) -> Option<SortOrder> {
        self.sorted
            .map(|column| SortOrder::new(column, self.descending[column.index()]))
    }

    /// Path segment for the current order, e.g. `distanceDesc/`.
    pub fn segment(&self) -> String {
        sort_segment(self.order())
    }

    pub fn sorted_column(&self) -> Option<SortColumn> {
        self.sorted
    }

    pub fn is_descending(&self, column: SortColumn) -> bool {
        self.descending[column.index()]
    }

    pub fn is_neutral(&self) -> bool {
        self.sorted.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Arrow shown next to the sorted column's header.
    pub fn indicator(&self, column: SortColumn) -> &'static str {
        match self.sorted {
            Some(sorted) if sorted == column => {
                if self.is_descending(column) {
                    "⭣"
                } else {
                    "⭡"
                }
            }
            _ => "",
        }
    }
}

impl From<SortOrder> for SortState {
    fn from(order: SortOrder) -> Self {
        let mut state = Self::default();
        state.sorted = Some(order.column);
        state.descending[order.column.index()] = order.descending;
        state
    }
}
