//! Flow-varying layout for irregular-metre forms (lyric metre): explicit
//! line breaks are preserved, each line is centered within the nominal page
//! width, and paragraph types scale their own cell size while staying on the
//! shared coarse grid step.

use super::{LayoutResult, RenderItem};
use crate::config::{ColumnOrder, Direction, LayoutConfig};
use crate::content::{ParagraphType, StructuredContent};

/// Per-type scale factors: (font size, line height, char advance)
fn scales(kind: ParagraphType) -> (f32, f32, f32) {
    match kind {
        ParagraphType::Small | ParagraphType::Note => (0.6, 0.7, 0.6),
        ParagraphType::Preface => (0.8, 0.8, 0.8),
        ParagraphType::Main | ParagraphType::Indent => (1.0, 1.0, 1.0),
    }
}

pub(super) fn calculate(content: &StructuredContent, config: &LayoutConfig) -> LayoutResult {
    let mut items: Vec<RenderItem> = Vec::new();
    let mut line_offsets: Vec<f32> = Vec::new();
    let page_width = config.columns as f32 * config.char_width;
    let mut current_y = config.padding_top;
    let mut row = 0usize;

    for paragraph in &content.paragraphs {
        let (fs, lhs, cws) = scales(paragraph.kind);
        let font_size = config.font_size * fs;
        let line_height = config.line_height * lhs;
        let char_width = config.char_width * cws;
        // wrap capacity on the shared grid step, so scaled paragraphs still
        // line up with the coarse cell boundaries
        let max_chars = ((page_width / char_width).floor() as usize).max(1);

        for line in &paragraph.lines {
            let chars: Vec<char> = line.chars().collect();
            let mut chunks: Vec<&[char]> = chars.chunks(max_chars).collect();
            if chunks.is_empty() {
                // an explicit empty line still advances the cursor
                chunks.push(&[]);
            }
            for (chunk_index, chunk) in chunks.into_iter().enumerate() {
                line_offsets.push(current_y);
                let line_width = chunk.len() as f32 * char_width;
                // the first segment of a source line is centered; forced
                // wraps restart at offset 0
                let start_x = if chunk_index == 0 {
                    config.padding_left + (page_width - line_width) / 2.0
                } else {
                    config.padding_left
                };
                for (col, &ch) in chunk.iter().enumerate() {
                    items.push(RenderItem {
                        ch,
                        x: start_x + col as f32 * char_width,
                        y: current_y,
                        row,
                        col,
                        kind: paragraph.kind,
                        width: char_width,
                        height: line_height,
                        font_size,
                    });
                }
                row += 1;
                current_y += line_height;
            }
        }
        current_y += line_height * 0.5;
    }

    // Vertical RTL is a post-pass: everything is placed left-to-right first,
    // then mirrored around the content extent on the cross axis.
    if config.direction == Direction::Vertical && config.column_order == ColumnOrder::Rtl {
        for item in &mut items {
            let relative = item.x - config.padding_left;
            item.x = config.padding_left + (page_width - relative - item.width);
        }
    }

    let total_height = if content.paragraphs.is_empty() {
        config.padding_top + config.padding_bottom
    } else {
        current_y + config.padding_bottom
    };
    LayoutResult::new(
        items,
        config.padding_left + page_width + config.padding_right,
        total_height,
        line_offsets,
    )
}
