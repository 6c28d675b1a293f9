//! Pagination: map the flat, strategy-ordered item sequence onto
//! (page, row, col) triples for a fixed page capacity. Used both for paged
//! on-screen presentation and for PDF page splitting.

use crate::config::{ColumnOrder, Direction};
use crate::error::CopybookError;
use crate::layout::RenderItem;
use serde::{Deserialize, Serialize};

/// Hard ceiling on emitted pages; pathological inputs are truncated with a
/// warning rather than looping unbounded.
pub const MAX_PAGES: usize = 200;

/// The fixed rows × cols that fit one export page at a given scale.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageCapacity {
    pub rows: usize,
    pub cols: usize,
    /// Cell shrink factor applied when a fixed grid overflows the page
    pub scale: f32,
}

impl PageCapacity {
    pub fn chars_per_page(&self) -> usize {
        self.rows * self.cols
    }
}

/// One cell placed on a concrete page. Derived from a [RenderItem] for the
/// duration of a single export; `visual_row`/`visual_col` already include any
/// column-order mirroring.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlacedCell {
    /// `None` is a blank filler cell that completes the page's grid
    pub ch: Option<char>,
    pub page_index: usize,
    pub visual_row: usize,
    pub visual_col: usize,
}

/// Map every item to its page-local position.
///
/// Items carry logical coordinates from a layout pass whose wrap capacity
/// matches this page capacity; each maps to a flat slot (gaps left by
/// paragraph breaks stay empty). With `fill_blank` every page is completed
/// with empty cells; without it (virtual-scroll mode) only realized cells are
/// generated. No two cells on a page collide.
pub fn paginate(
    items: &[RenderItem],
    capacity: PageCapacity,
    direction: Direction,
    column_order: ColumnOrder,
    fill_blank: bool,
) -> Result<Vec<PlacedCell>, CopybookError> {
    let chars_per_page = capacity.chars_per_page();
    if chars_per_page == 0 {
        return Err(CopybookError::invalid_configuration(format!(
            "page capacity {}x{} holds no cells",
            capacity.rows, capacity.cols
        )));
    }

    let slot_of = |item: &RenderItem| match direction {
        Direction::Vertical => item.col * capacity.rows + item.row,
        Direction::Horizontal => item.row * capacity.cols + item.col,
    };
    let max_slots = MAX_PAGES * chars_per_page;

    let place = |slot: usize, ch: Option<char>| {
        let on_page = slot % chars_per_page;
        let (row, col) = match direction {
            Direction::Vertical => (on_page % capacity.rows, on_page / capacity.rows),
            Direction::Horizontal => (on_page / capacity.cols, on_page % capacity.cols),
        };
        let visual_col = if direction == Direction::Vertical && column_order == ColumnOrder::Rtl {
            (capacity.cols - 1) - col
        } else {
            col
        };
        PlacedCell {
            ch,
            page_index: slot / chars_per_page,
            visual_row: row,
            visual_col,
        }
    };

    let cells = if fill_blank {
        let last_slot = items.iter().map(slot_of).max();
        let total = match last_slot {
            Some(last) => (last + 1).div_ceil(chars_per_page) * chars_per_page,
            None => chars_per_page,
        };
        if total > max_slots {
            log::warn!(
                "pagination truncated at {MAX_PAGES} pages ({} cells dropped)",
                total - max_slots
            );
        }
        let mut occupied: Vec<Option<char>> = vec![None; total.min(max_slots)];
        for item in items {
            let slot = slot_of(item);
            if slot < occupied.len() {
                occupied[slot] = Some(item.ch);
            }
        }
        occupied
            .into_iter()
            .enumerate()
            .map(|(slot, ch)| place(slot, ch))
            .collect()
    } else {
        let dropped = items.iter().filter(|item| slot_of(item) >= max_slots).count();
        if dropped > 0 {
            log::warn!("pagination truncated at {MAX_PAGES} pages ({dropped} cells dropped)");
        }
        items
            .iter()
            .filter(|item| slot_of(item) < max_slots)
            .map(|item| place(slot_of(item), Some(item.ch)))
            .collect()
    };

    Ok(cells)
}
