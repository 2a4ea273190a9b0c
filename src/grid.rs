use std::ops::Range;

/// Rows taken by one card, borders included.
pub const CARD_HEIGHT: u16 = 6;
/// Header and status bar.
const LAYOUT_OVERHEAD: u16 = 2;

/// Cards per row for a terminal width: 1 on narrow terminals up to 4 on
/// wide ones.
pub fn columns_for_width(width: u16) -> usize {
    match width {
        0..=59 => 1,
        60..=89 => 2,
        90..=119 => 3,
        _ => 4,
    }
}

/// Which part of the card grid is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridViewport {
    pub columns: usize,
    /// Whole card rows that fit in the body area
    pub rows: usize,
    pub first_row: usize,
}

impl Default for GridViewport {
    fn default() -> Self {
        Self {
            columns: 1,
            rows: 1,
            first_row: 0,
        }
    }
}

impl GridViewport {
    pub fn resize(&mut self, width: u16, height: u16) {
        self.columns = columns_for_width(width);
        let body = height.saturating_sub(LAYOUT_OVERHEAD);
        self.rows = usize::from((body / CARD_HEIGHT).max(1));
    }

    /// Cards per screenful
    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    pub fn row_of(&self, index: usize) -> usize {
        index / self.columns
    }

    /// Indices of the cards currently on screen, clamped to `len`.
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        let start = (self.first_row * self.columns).min(len);
        let end = ((self.first_row + self.rows) * self.columns).min(len);
        start..end
    }

    /// Scroll the least amount needed to show card `index`.
    pub fn scroll_to(&mut self, index: usize) {
        let row = self.row_of(index);
        if row < self.first_row {
            self.first_row = row;
        } else if row >= self.first_row + self.rows {
            self.first_row = row + 1 - self.rows;
        }
    }
}
