//! Resolved, immutable layout configuration.
//!
//! A [LayoutConfig] is a plain value: every layout call receives one
//! explicitly and the engine never reads ambient mutable state. Crossing a
//! worker thread boundary is therefore a plain copy.

use crate::error::CopybookError;
use serde::{Deserialize, Serialize};

/// Capacity sentinel: any wrap capacity above this is treated as unbounded,
/// used when pre-computing the full content stream before pagination.
pub const UNBOUNDED: usize = 1_000_000;

/// Reading direction of the sheet
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Characters run top-to-bottom in columns
    Vertical,
    /// Characters run left-to-right in rows
    #[default]
    Horizontal,
}

/// Order in which vertical columns advance across the page
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnOrder {
    /// Classical order: the first column is the rightmost
    #[default]
    Rtl,
    Ltr,
}

/// How much of the cell frame is drawn
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderMode {
    /// Full box around every cell
    #[default]
    Full,
    /// Only the writing-direction guide line
    LinesOnly,
    None,
}

/// The decorative guide glyph-frame drawn inside each full-bordered cell
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridDecoration {
    /// 米字格: midlines plus both diagonals
    #[default]
    Mizi,
    /// 田字格: midlines only
    Tianzi,
    /// 回宫格: inner box at a 25% inset
    Huigong,
    None,
}

/// User-fixed grid dimensions. In vertical direction `rows` is authoritative
/// and columns derive from the text length; in horizontal direction `cols`
/// is authoritative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedGrid {
    pub rows: usize,
    pub cols: usize,
}

/// Paragraph boundary handling for the grid-standard strategy.
///
/// The unbounded pre-pagination pass always flows continuously regardless of
/// this setting; see [Strategy](crate::layout::Strategy) for the rule.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParagraphFlow {
    /// Force a fresh column (vertical) or row (horizontal) at each paragraph
    /// boundary even if the current one is not full
    #[default]
    BreakColumn,
    /// Flow straight through paragraph boundaries
    Continuous,
}

/// Resolved configuration for one layout pass. All lengths are in canvas
/// pixels; the export stage converts to page units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Nominal font size for `main` paragraphs
    pub font_size: f32,
    /// Vertical advance per logical line for `main` paragraphs
    pub line_height: f32,
    /// Horizontal advance per character for `main` paragraphs
    pub char_width: f32,
    /// Edge of one grid cell
    pub cell_size: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub padding_left: f32,
    pub padding_right: f32,
    /// Logical row capacity (cells per column in vertical direction). Values
    /// above [UNBOUNDED] mean the axis is left open for pagination.
    pub rows: usize,
    /// Logical column capacity (cells per row in horizontal direction).
    /// Values above [UNBOUNDED] mean the axis is left open for pagination.
    pub columns: usize,
    pub direction: Direction,
    pub column_order: ColumnOrder,
    pub border_mode: BorderMode,
    pub decoration: GridDecoration,
    pub fixed_grid: Option<FixedGrid>,
    /// Infer grid dimensions from the text's natural line length
    pub smart_snap: bool,
    pub paragraph_flow: ParagraphFlow,
    /// Optional cap on visual rows; rows beyond the cap are not generated
    pub max_rows: Option<usize>,
}

impl Default for LayoutConfig {
    fn default() -> LayoutConfig {
        LayoutConfig {
            font_size: 32.0,
            line_height: 48.0,
            char_width: 32.0,
            cell_size: crate::grid::CELL_SIZE,
            padding_top: 60.0,
            padding_bottom: 60.0,
            padding_left: 40.0,
            padding_right: 40.0,
            rows: 10,
            columns: 14,
            direction: Direction::Horizontal,
            column_order: ColumnOrder::Rtl,
            border_mode: BorderMode::Full,
            decoration: GridDecoration::Mizi,
            fixed_grid: None,
            smart_snap: false,
            paragraph_flow: ParagraphFlow::BreakColumn,
            max_rows: None,
        }
    }
}

impl LayoutConfig {
    /// Whether this pass computes the full stream on an effectively
    /// unbounded canvas (one axis left to pagination).
    pub fn is_unbounded(&self) -> bool {
        self.rows > UNBOUNDED || self.columns > UNBOUNDED
    }

    /// Cells per reading line before wrapping: the row capacity in vertical
    /// direction, the column capacity in horizontal direction.
    pub fn wrap_capacity(&self) -> usize {
        match self.direction {
            Direction::Vertical => self.rows,
            Direction::Horizontal => self.columns,
        }
    }

    /// Check the invariants a layout pass relies on. A configuration that
    /// can only produce a zero-capacity grid is rejected here rather than
    /// silently yielding an empty result.
    pub fn validate(&self) -> Result<(), CopybookError> {
        if !(self.cell_size > 0.0) {
            return Err(CopybookError::invalid_configuration(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        if !(self.font_size > 0.0) || !(self.char_width > 0.0) || !(self.line_height > 0.0) {
            return Err(CopybookError::invalid_configuration(
                "font size, char width and line height must all be positive",
            ));
        }
        if self.rows == 0 || self.columns == 0 {
            return Err(CopybookError::invalid_configuration(
                "grid capacity of zero cells",
            ));
        }
        if let Some(fixed) = self.fixed_grid {
            if fixed.rows == 0 || fixed.cols == 0 {
                return Err(CopybookError::invalid_configuration(format!(
                    "fixed grid must be at least 1x1, got {}x{}",
                    fixed.rows, fixed.cols
                )));
            }
        }
        Ok(())
    }
}
