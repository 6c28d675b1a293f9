use crate::colour::Colour;
use crate::font::Font;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use pdf_writer::{Finish, Name, Pdf};
use std::io::Write;

/// A font reference within a span: the arena index of the document font
/// plus the size to draw it at.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub index: usize,
    pub size: Pt,
}

/// A single positioned run of text. Coordinates are the baseline start in
/// page space (origin bottom-left).
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(Vec<SpanLayout>),
    /// Pre-built content stream operators, used for grid and guide drawing.
    Raw(Vec<u8>),
}

pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// The laid out content, rendered in insertion order
    pub contents: Vec<PageContents>,
}

pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(value: Pt) -> Margins {
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn symmetric(vertical: Pt, horizontal: Pt) -> Margins {
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

impl Page {
    pub fn new(width: Pt, height: Pt, margins: Margins) -> Page {
        Page {
            media_box: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: width,
                y2: height,
            },
            content_box: Rect {
                x1: margins.left,
                y1: margins.bottom,
                x2: width - margins.right,
                y2: height - margins.top,
            },
            contents: Vec::default(),
        }
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(PageContents::Text(vec![span]));
    }

    pub fn add_raw(&mut self, operators: Vec<u8>) {
        self.contents.push(PageContents::Raw(operators));
    }

    fn write_colour(content: &mut Vec<u8>, colour: Colour, stroke: bool) {
        match (colour, stroke) {
            (Colour::RGB { r, g, b }, false) => writeln!(content, "{r} {g} {b} rg"),
            (Colour::RGB { r, g, b }, true) => writeln!(content, "{r} {g} {b} RG"),
            (Colour::Grey { g }, false) => writeln!(content, "{g} g"),
            (Colour::Grey { g }, true) => writeln!(content, "{g} G"),
        }
        .expect("writing to a Vec cannot fail");
    }

    fn render(&self, fonts: &[&Font]) -> Vec<u8> {
        if self.contents.is_empty() {
            return Vec::default();
        }
        let mut content: Vec<u8> = Vec::default();

        for page_content in self.contents.iter() {
            match page_content {
                PageContents::Text(spans) => {
                    let Some(first) = spans.first() else { continue };
                    writeln!(&mut content, "q").expect("writing to a Vec cannot fail");
                    let mut current_font: SpanFont = first.font;
                    let mut current_colour: Colour = first.colour;

                    writeln!(
                        &mut content,
                        "/F{} {} Tf",
                        current_font.index, current_font.size.0
                    )
                    .expect("writing to a Vec cannot fail");
                    Self::write_colour(&mut content, current_colour, false);

                    for span in spans.iter() {
                        if span.font != current_font {
                            current_font = span.font;
                            writeln!(
                                &mut content,
                                "/F{} {} Tf",
                                current_font.index, current_font.size.0
                            )
                            .expect("writing to a Vec cannot fail");
                        }
                        if span.colour != current_colour {
                            current_colour = span.colour;
                            Self::write_colour(&mut content, current_colour, false);
                        }

                        writeln!(&mut content, "BT").expect("writing to a Vec cannot fail");
                        writeln!(&mut content, "{} {} Td", span.coords.0 .0, span.coords.1 .0)
                            .expect("writing to a Vec cannot fail");
                        write!(&mut content, "<").expect("writing to a Vec cannot fail");
                        for ch in span.text.chars() {
                            let gid = fonts
                                .get(span.font.index)
                                .and_then(|font| font.glyph_id(ch))
                                .unwrap_or(0);
                            write!(&mut content, "{gid:04x}")
                                .expect("writing to a Vec cannot fail");
                        }
                        writeln!(&mut content, "> Tj").expect("writing to a Vec cannot fail");
                        writeln!(&mut content, "ET").expect("writing to a Vec cannot fail");
                    }
                    writeln!(&mut content, "Q").expect("writing to a Vec cannot fail");
                }
                PageContents::Raw(operators) => {
                    writeln!(&mut content, "q").expect("writing to a Vec cannot fail");
                    content.extend_from_slice(operators);
                    writeln!(&mut content, "Q").expect("writing to a Vec cannot fail");
                }
            }
        }

        content
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &[&Font],
        writer: &mut Pdf,
    ) {
        // the page tree generates page refs ahead of time
        let id = match refs.get(RefType::Page(page_index)) {
            Some(id) => id,
            None => refs.gen(RefType::Page(page_index)),
        };
        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        if let Some(tree) = refs.get(RefType::PageTree) {
            page.parent(tree);
        }

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (i, _) in fonts.iter().enumerate() {
            if let Some(font_ref) = refs.get(RefType::Font(i)) {
                resource_fonts.pair(Name(format!("F{i}").as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();
        resources.finish();

        let content_id = refs.gen(RefType::ContentForPage(page_index));
        page.contents(content_id);
        page.finish();

        let rendered = self.render(fonts);
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            rendered.as_slice(),
            miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
        );
        let mut stream = writer.stream(content_id, compressed.as_slice());
        stream.filter(pdf_writer::Filter::FlateDecode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;
    use crate::units::Mm;

    fn a4() -> Page {
        Page::new(
            Mm(210.0).into(),
            Mm(297.0).into(),
            Margins::all(Mm(15.0).into()),
        )
    }

    #[test]
    fn content_box_insets_by_margins() {
        let page = a4();
        assert!((page.content_box.x1.0 - Pt::from(Mm(15.0)).0).abs() < 1e-4);
        assert!((page.media_box.x2.0 - Pt::from(Mm(210.0)).0).abs() < 1e-4);
        assert!(page.content_box.y2.0 < page.media_box.y2.0);
        assert!(page.content_box.width().0 > 0.0);
    }

    #[test]
    fn empty_page_renders_nothing() {
        let page = a4();
        assert!(page.render(&[]).is_empty());
    }

    #[test]
    fn raw_content_is_wrapped_in_state_guards() {
        let mut page = a4();
        page.add_raw(b"1 w\n0 0 m 10 10 l S\n".to_vec());
        let rendered = page.render(&[]);
        let text = String::from_utf8(rendered).unwrap();
        assert!(text.starts_with("q\n"));
        assert!(text.trim_end().ends_with('Q'));
        assert!(text.contains("0 0 m 10 10 l S"));
    }

    #[test]
    fn grey_and_rgb_colour_operators() {
        let mut out = Vec::new();
        Page::write_colour(&mut out, colours::BLACK, false);
        Page::write_colour(&mut out, Colour::new_rgb(1.0, 0.0, 0.0), true);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("0 g"));
        assert!(text.contains("1 0 0 RG"));
    }
}
