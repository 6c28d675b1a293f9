//! Layout strategies: map structured content onto absolute cell positions.
//!
//! Three strategies cover the classical forms:
//!
//! - [Strategy::GridStandard]: fixed-meter poetry on a strict cell grid
//! - [Strategy::FlowVarying]: irregular-meter forms (lyric metre), each line
//!   centered with per-paragraph-type scaling
//! - [Strategy::CenterAligned]: free-form prose, each source line centered
//!   independently
//!
//! All strategies are pure functions of `(content, config)`: identical inputs
//! produce bit-identical item sequences, which pagination and tests rely on.

mod center_aligned;
mod flow_varying;
mod grid_standard;

use crate::config::LayoutConfig;
use crate::content::{ParagraphType, StructuredContent};
use crate::error::CopybookError;
use serde::{Deserialize, Serialize};

/// Extra canvas above and below the viewport that still counts as visible,
/// so scrolling has pre-rendered cells to reveal.
pub const PRE_RENDER_MARGIN: f32 = 100.0;

/// One placed character cell. Produced once per layout pass and immutable;
/// the position in the result sequence is the canonical reading order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderItem {
    pub ch: char,
    /// Position within the full (unbounded) canvas, in canvas pixels
    pub x: f32,
    pub y: f32,
    /// Logical grid indices, independent of any visual mirroring
    pub row: usize,
    pub col: usize,
    pub kind: ParagraphType,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
}

/// The output of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// Placed characters in canonical reading order
    pub items: Vec<RenderItem>,
    pub total_width: f32,
    pub total_height: f32,
    /// Y-offset of each visual line, non-decreasing
    pub line_offsets: Vec<f32>,
    /// Whether `items` are non-decreasing in y, enabling the binary-search
    /// viewport query fast path
    y_monotone: bool,
}

impl LayoutResult {
    pub(crate) fn new(
        items: Vec<RenderItem>,
        total_width: f32,
        total_height: f32,
        line_offsets: Vec<f32>,
    ) -> LayoutResult {
        let y_monotone = items.windows(2).all(|w| w[0].y <= w[1].y);
        LayoutResult {
            items,
            total_width,
            total_height,
            line_offsets,
            y_monotone,
        }
    }

    /// The subsequence of items visible in a viewport, with
    /// [PRE_RENDER_MARGIN] slack on both sides.
    ///
    /// When items are sorted by y this binary-searches for the first
    /// candidate and stops at the first item past the viewport; otherwise it
    /// degrades to a linear filter. Either way the result equals the
    /// brute-force filter over `y ∈ [scroll - margin, scroll + height + margin]`.
    pub fn viewport_items(&self, scroll_offset: f32, view_height: f32) -> Vec<RenderItem> {
        let start_y = scroll_offset - PRE_RENDER_MARGIN;
        let end_y = scroll_offset + view_height + PRE_RENDER_MARGIN;

        if !self.y_monotone {
            return self
                .items
                .iter()
                .filter(|item| item.y >= start_y && item.y <= end_y)
                .copied()
                .collect();
        }

        let first = self.items.partition_point(|item| item.y < start_y);
        self.items[first..]
            .iter()
            .take_while(|item| item.y <= end_y)
            .copied()
            .collect()
    }
}

/// The three layout strategies. Selected explicitly, or inferred from the
/// content's shape with [Strategy::detect]; an explicit choice always wins.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    GridStandard,
    FlowVarying,
    CenterAligned,
}

impl Strategy {
    /// Advisory strategy selection over the content's shape: regular metre
    /// goes on the grid, a leading `main` paragraph flows, everything else is
    /// centered prose.
    pub fn detect(content: &StructuredContent) -> Strategy {
        let Some(first) = content.paragraphs.first() else {
            return Strategy::GridStandard;
        };
        if first.lines.len() <= 1 {
            return Strategy::GridStandard;
        }

        let first_len = first.lines[0].chars().count();
        let uniform = content
            .paragraphs
            .iter()
            .all(|p| p.lines.iter().all(|l| l.chars().count() == first_len));
        if uniform && first_len <= 10 {
            return Strategy::GridStandard;
        }

        if first.kind == ParagraphType::Main {
            Strategy::FlowVarying
        } else {
            Strategy::CenterAligned
        }
    }

    /// Run the layout pass. Pure: no hidden state, no ambient configuration.
    pub fn calculate(
        &self,
        content: &StructuredContent,
        config: &LayoutConfig,
    ) -> Result<LayoutResult, CopybookError> {
        config.validate()?;
        let result = match self {
            Strategy::GridStandard => grid_standard::calculate(content, config),
            Strategy::FlowVarying => flow_varying::calculate(content, config),
            Strategy::CenterAligned => center_aligned::calculate(content, config),
        };
        log::debug!(
            "{self:?} placed {} items over {:.0}x{:.0}",
            result.items.len(),
            result.total_width,
            result.total_height,
        );
        Ok(result)
    }
}

/// Per-cell gaps on each axis for a border mode. Lines-only borders keep the
/// gap on the axis the guide lines separate and collapse the other.
pub(crate) fn effective_gaps(config: &LayoutConfig, gap: f32) -> (f32, f32) {
    use crate::config::{BorderMode, Direction};
    match config.border_mode {
        BorderMode::Full => (gap, gap),
        BorderMode::LinesOnly => match config.direction {
            Direction::Vertical => (gap, 0.0),
            Direction::Horizontal => (0.0, gap),
        },
        BorderMode::None => (0.0, 0.0),
    }
}
