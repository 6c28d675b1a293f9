use crate::{
    font::Font,
    info::Info,
    page::Page,
    refs::{ObjectReferences, RefType},
    CopybookError,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

/// A document stores pages and fonts, then renders the whole PDF with a
/// call to [Document::write].
#[derive(Default)]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub fonts: Arena<Font>,
}

impl Document {
    /// Sets information about the document. If not provided, no information
    /// block will be written to the PDF.
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document, returning its id. The id stays
    /// valid as long as pages are not removed or reordered.
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    /// Get the 0-based index of a page given its id. Changing the page order
    /// after this call invalidates the returned index.
    pub fn index_of_page(&self, page: Id<Page>) -> Option<usize> {
        self.page_order.iter().position(|&p| p == page)
    }

    /// Get the page id at the given index, if one exists.
    pub fn id_of_page_index(&self, page_index: usize) -> Option<Id<Page>> {
        self.page_order.get(page_index).copied()
    }

    /// Add a font to the document. Fonts are stored globally, so any page can
    /// refer to one through its arena index.
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// Write the entire document to the writer. The document is rendered in
    /// memory first, so very large documents allocate accordingly.
    ///
    /// Until `write` is called references are unresolved, so pages and fonts
    /// can still be added or edited; `write` generates all PDF objects and
    /// cross-references in one pass.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), CopybookError> {
        let Document {
            info,
            pages,
            page_order,
            fonts,
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        // page refs are keyed by page_order index, not arena index, so the
        // page tree reflects the document order
        let page_refs: Vec<Ref> = page_order
            .iter()
            .enumerate()
            .map(|(i, _id)| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (i, font) in fonts.iter() {
            font.write(&mut refs, i, &mut writer);
        }

        let font_slices: Vec<&Font> = fonts.iter().map(|(_, font)| font).collect();
        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages.get(*id).ok_or(CopybookError::PageMissing)?;
            page.write(&mut refs, page_index, &font_slices, &mut writer);
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Margins;
    use crate::units::Mm;

    fn blank_page() -> Page {
        Page::new(
            Mm(210.0).into(),
            Mm(297.0).into(),
            Margins::all(Mm(15.0).into()),
        )
    }

    #[test]
    fn page_order_tracks_insertion() {
        let mut doc = Document::default();
        let first = doc.add_page(blank_page());
        let second = doc.add_page(blank_page());
        assert_eq!(doc.index_of_page(first), Some(0));
        assert_eq!(doc.index_of_page(second), Some(1));
        assert_eq!(doc.id_of_page_index(1), Some(second));
        assert_eq!(doc.id_of_page_index(2), None);
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn empty_document_writes_valid_header() {
        let doc = Document::default();
        let mut out: Vec<u8> = Vec::new();
        doc.write(&mut out).unwrap();
        assert!(out.starts_with(b"%PDF-"));
        assert!(out.windows(5).any(|w| w == b"%%EOF"));
    }

    #[test]
    fn written_document_contains_its_pages() {
        let mut doc = Document::default();
        doc.add_page(blank_page());
        doc.add_page(blank_page());
        let mut out: Vec<u8> = Vec::new();
        doc.write(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("/Count 2"));
    }
}
