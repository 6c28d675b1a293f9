//! Center-aligned layout for free-form prose: every source line is centered
//! independently with no forced wrap, and paragraphs are separated by a
//! wider gap than lines so blocks read as blocks.

use super::{LayoutResult, RenderItem};
use crate::config::LayoutConfig;
use crate::content::{ParagraphType, StructuredContent};

/// Per-type scale factors: (font size, line height, char advance)
fn scales(kind: ParagraphType) -> (f32, f32, f32) {
    match kind {
        ParagraphType::Small | ParagraphType::Note => (0.7, 0.8, 0.7),
        _ => (1.0, 1.0, 1.0),
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

        for line in &paragraph.lines {
            line_offsets.push(current_y);
            let chars: Vec<char> = line.chars().collect();
            let line_width = chars.len() as f32 * char_width;
            let start_x = config.padding_left + ((page_width - line_width) / 2.0).max(0.0);
            for (col, &ch) in chars.iter().enumerate() {
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
        // wider than the flow strategy's half-line so prose blocks separate
        current_y += line_height * 0.8;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Paragraph;
    use crate::layout::Strategy;

    #[test]
    fn long_lines_do_not_wrap() {
        let text: String = std::iter::repeat('字').take(30).collect();
        let content = StructuredContent {
            paragraphs: vec![Paragraph::main(vec![text.as_str()])],
        };
        let config = LayoutConfig::default();
        let result = Strategy::CenterAligned.calculate(&content, &config).unwrap();
        assert_eq!(result.items.len(), 30);
        assert!(result.items.iter().all(|item| item.row == 0));
        // an over-wide line clamps to the left padding instead of going negative
        assert_eq!(result.items[0].x, config.padding_left);
    }

    #[test]
    fn paragraph_gap_is_wider_than_line_gap() {
        let content = StructuredContent {
            paragraphs: vec![
                Paragraph::main(vec!["第一段一行", "第一段二行"]),
                Paragraph::main(vec!["第二段"]),
            ],
        };
        let config = LayoutConfig::default();
        let result = Strategy::CenterAligned.calculate(&content, &config).unwrap();
        let line_gap = result.items[5].y - result.items[0].y;
        let para_gap = result.items[10].y - result.items[5].y;
        assert_eq!(line_gap, config.line_height);
        assert_eq!(para_gap, config.line_height * 1.8);
    }

    #[test]
    fn note_paragraphs_scale_down() {
        let mut para = Paragraph::main(vec!["注"]);
        para.kind = ParagraphType::Note;
        let content = StructuredContent { paragraphs: vec![para] };
        let config = LayoutConfig::default();
        let result = Strategy::CenterAligned.calculate(&content, &config).unwrap();
        assert_eq!(result.items[0].font_size, config.font_size * 0.7);
        assert_eq!(result.items[0].height, config.line_height * 0.8);
    }
}
