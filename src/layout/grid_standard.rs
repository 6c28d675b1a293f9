//! Grid-standard layout: one character per fixed cell, filling columns
//! (vertical) or rows (horizontal) in strict order. Used for fixed-meter
//! classical poetry, where line structure is informational rather than
//! load-bearing.

use super::{effective_gaps, LayoutResult, RenderItem};
use crate::config::{ColumnOrder, Direction, LayoutConfig, ParagraphFlow};
use crate::content::{ParagraphType, StructuredContent};
use crate::grid::gap_for;

pub(super) fn calculate(content: &StructuredContent, config: &LayoutConfig) -> LayoutResult {
    let capacity = config.wrap_capacity();
    let gap = gap_for(config.border_mode);
    let (col_gap, row_gap) = effective_gaps(config, gap);
    let cell = config.cell_size;
    let vertical = config.direction == Direction::Vertical;

    // Paragraph boundaries force a fresh line in break-column mode; the
    // unbounded pre-pagination pass always flows continuously so page
    // splitting sees one uninterrupted stream.
    let break_paragraphs =
        config.paragraph_flow == ParagraphFlow::BreakColumn && !config.is_unbounded();

    // Flatten paragraph lines into (char, kind, logical index)
    let mut slots: Vec<(char, ParagraphType, usize)> = Vec::new();
    let mut index = 0usize;
    for paragraph in &content.paragraphs {
        for line in &paragraph.lines {
            for ch in line.chars() {
                slots.push((ch, paragraph.kind, index));
                index += 1;
            }
        }
        if break_paragraphs && index % capacity != 0 {
            index += capacity - index % capacity;
        }
    }

    let lines_used = index.div_ceil(capacity).max(if slots.is_empty() { 0 } else { 1 });

    let mut items: Vec<RenderItem> = Vec::with_capacity(slots.len());
    for (ch, kind, i) in slots {
        let (row, col) = if vertical {
            (i % capacity, i / capacity)
        } else {
            (i / capacity, i % capacity)
        };
        if let Some(max_rows) = config.max_rows {
            if !vertical && row >= max_rows {
                break;
            }
        }

        // RTL mirrors the visual position only; the logical indices stand
        let visual_col = if vertical && config.column_order == ColumnOrder::Rtl {
            (lines_used - 1) - col
        } else {
            col
        };

        items.push(RenderItem {
            ch,
            x: config.padding_left + visual_col as f32 * (cell + col_gap),
            y: config.padding_top + row as f32 * (cell + row_gap),
            row,
            col,
            kind,
            width: cell,
            height: cell,
            font_size: config.font_size,
        });
    }

    let (rows_total, cols_total) = if vertical {
        (capacity.min(index.max(1)), lines_used)
    } else {
        (lines_used, capacity)
    };
    let span = |count: usize, g: f32| {
        if count == 0 {
            0.0
        } else {
            count as f32 * (cell + g) - g
        }
    };
    let total_width = config.padding_left + span(cols_total, col_gap) + config.padding_right;
    let total_height = config.padding_top + span(rows_total, row_gap) + config.padding_bottom;

    let line_offsets = if vertical {
        // every column starts at the top edge
        vec![config.padding_top; lines_used]
    } else {
        (0..lines_used)
            .map(|r| config.padding_top + r as f32 * (cell + row_gap))
            .collect()
    };

    LayoutResult::new(items, total_width, total_height, line_offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Paragraph;
    use crate::layout::Strategy;

    fn single(text: &str) -> StructuredContent {
        StructuredContent {
            paragraphs: vec![Paragraph::main(vec![text])],
        }
    }

    fn vertical_config(rows: usize) -> LayoutConfig {
        LayoutConfig {
            direction: Direction::Vertical,
            rows,
            columns: 2,
            border_mode: crate::config::BorderMode::None,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn vertical_fill_five_by_two() {
        // 10 chars, 5 rows: chars 0-4 in column 0, 5-9 in column 1
        let result = Strategy::GridStandard
            .calculate(&single("床前明月光疑是地上霜"), &vertical_config(5))
            .unwrap();
        assert_eq!(result.items.len(), 10);
        for (i, item) in result.items.iter().enumerate() {
            assert_eq!(item.col, i / 5);
            assert_eq!(item.row, i % 5);
        }
    }

    #[test]
    fn rtl_puts_first_column_rightmost() {
        let config = LayoutConfig {
            column_order: ColumnOrder::Rtl,
            ..vertical_config(5)
        };
        let result = Strategy::GridStandard
            .calculate(&single("床前明月光疑是地上霜"), &config)
            .unwrap();
        // char 0 (logical column 0) renders right of char 5 (logical column 1)
        assert!(result.items[0].x > result.items[5].x);
        assert_eq!(result.items[0].y, result.items[5].y);
    }

    #[test]
    fn ltr_keeps_first_column_leftmost() {
        let config = LayoutConfig {
            column_order: ColumnOrder::Ltr,
            ..vertical_config(5)
        };
        let result = Strategy::GridStandard
            .calculate(&single("床前明月光疑是地上霜"), &config)
            .unwrap();
        assert!(result.items[0].x < result.items[5].x);
    }

    #[test]
    fn horizontal_row_major() {
        let config = LayoutConfig {
            direction: Direction::Horizontal,
            columns: 4,
            border_mode: crate::config::BorderMode::None,
            ..LayoutConfig::default()
        };
        let result = Strategy::GridStandard
            .calculate(&single("床前明月光疑是地上霜"), &config)
            .unwrap();
        assert_eq!(result.items[5].row, 1);
        assert_eq!(result.items[5].col, 1);
        assert_eq!(result.items[5].y, config.padding_top + config.cell_size);
    }

    #[test]
    fn paragraph_break_starts_fresh_column() {
        let content = StructuredContent {
            paragraphs: vec![Paragraph::main(vec!["床前明"]), Paragraph::main(vec!["月光"])],
        };
        let result = Strategy::GridStandard
            .calculate(&content, &vertical_config(5))
            .unwrap();
        // second paragraph starts at the top of column 1 despite column 0
        // having room for two more cells
        assert_eq!(result.items[3].col, 1);
        assert_eq!(result.items[3].row, 0);
    }

    #[test]
    fn continuous_flow_ignores_paragraphs() {
        let content = StructuredContent {
            paragraphs: vec![Paragraph::main(vec!["床前明"]), Paragraph::main(vec!["月光"])],
        };
        let config = LayoutConfig {
            paragraph_flow: ParagraphFlow::Continuous,
            ..vertical_config(5)
        };
        let result = Strategy::GridStandard.calculate(&content, &config).unwrap();
        assert_eq!(result.items[3].col, 0);
        assert_eq!(result.items[3].row, 3);
    }

    #[test]
    fn unbounded_mode_flows_continuously() {
        let content = StructuredContent {
            paragraphs: vec![Paragraph::main(vec!["床前明"]), Paragraph::main(vec!["月光"])],
        };
        let config = LayoutConfig {
            columns: crate::config::UNBOUNDED + 1,
            paragraph_flow: ParagraphFlow::BreakColumn,
            ..vertical_config(5)
        };
        let result = Strategy::GridStandard.calculate(&content, &config).unwrap();
        assert_eq!(result.items[3].row, 3);
    }

    #[test]
    fn gap_widens_cell_pitch() {
        let config = LayoutConfig {
            direction: Direction::Horizontal,
            columns: 10,
            border_mode: crate::config::BorderMode::Full,
            ..LayoutConfig::default()
        };
        let result = Strategy::GridStandard.calculate(&single("床前"), &config).unwrap();
        let pitch = result.items[1].x - result.items[0].x;
        assert_eq!(pitch, config.cell_size + crate::grid::GRID_GAP);
    }
}
