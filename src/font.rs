use crate::{
    refs::{ObjectReferences, RefType},
    CopybookError, Pt,
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use pdf_writer::{
    types::{FontFlags, SystemInfo},
    Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;

/// A parsed font, embedded into generated documents as a Type0/CIDFontType2
/// font with Identity-H encoding so any unicode text can be drawn.
///
/// Callers that know the final text up front should pass the bytes through
/// [`subset`](crate::subset::subset) before loading; the embedder writes
/// whatever glyph set the loaded face carries.
///
/// Fonts are referred to throughout by their arena index within the document,
/// not by typed references.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, returning an error if the face cannot
    /// be parsed.
    pub fn load(bytes: Vec<u8>) -> Result<Font, CopybookError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    /// The full name of the font, or its family name when the full name
    /// record is absent.
    pub fn name(&self) -> String {
        self.unicode_name(owned_ttf_parser::name_id::FULL_NAME)
            .unwrap_or_else(|| self.family())
    }

    /// The family name of the font.
    pub fn family(&self) -> String {
        self.unicode_name(owned_ttf_parser::name_id::FAMILY)
            .unwrap_or_else(|| "Unnamed".to_string())
    }

    fn unicode_name(&self, name_id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    /// The distance from the baseline to the top of the font at a given size.
    pub fn ascent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().ascender() as f32
    }

    /// The distance from the baseline to the bottom of the font at a given
    /// size. Usually negative.
    pub fn descent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().descender() as f32
    }

    /// The default line height at a given size: ascent minus descent plus
    /// the font's line gap.
    pub fn line_height(&self, size: Pt) -> Pt {
        let scaling = self.scaling(size);
        let leading: Pt = scaling * self.face.as_face_ref().line_gap() as f32;
        let ascent: Pt = scaling * self.face.as_face_ref().ascender() as f32;
        let descent: Pt = scaling * self.face.as_face_ref().descender() as f32;
        leading + ascent - descent
    }

    /// The advance width of a string at a given size, summing per-glyph
    /// horizontal advances. Characters without a glyph contribute nothing.
    pub fn width_of(&self, text: &str, size: Pt) -> Pt {
        let face = self.face.as_face_ref();
        let units: u32 = text
            .chars()
            .filter_map(|ch| face.glyph_index(ch))
            .filter_map(|gid| face.glyph_hor_advance(gid))
            .map(u32::from)
            .sum();
        self.scaling(size) * units as f32
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    /// Every unicode codepoint the face maps, keyed by glyph id. Used for
    /// the CID widths array and the ToUnicode CMap.
    fn glyph_ids(&self) -> HashMap<u16, char> {
        let mut map: HashMap<u16, char> = HashMap::new();
        let Some(cmap) = self.face.as_face_ref().tables().cmap else {
            return map;
        };
        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                if let Ok(ch) = char::try_from(codepoint) {
                    if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0)
                    {
                        map.entry(index.0).or_insert(ch);
                    }
                }
            });
        }
        map
    }

    /// Advance width and height per mapped glyph, in font units.
    fn glyph_metrics(&self, ids: &HashMap<u16, char>) -> HashMap<u16, (u16, i16)> {
        let face = self.face.as_face_ref();
        let mut metrics: HashMap<u16, (u16, i16)> = HashMap::new();
        for (&id, &ch) in ids.iter() {
            let Some(gid) = face.glyph_index(ch) else { continue };
            let Some(h_advance) = face.glyph_hor_advance(gid) else { continue };
            let height = face
                .glyph_bounding_box(gid)
                .map(|bbox| bbox.y_max - bbox.y_min - face.descender())
                .unwrap_or(1000);
            metrics.insert(id, (h_advance, height));
        }
        metrics
    }

    fn write_cid(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let font_descriptor_id = self.write_descriptor(refs, font_index, writer);

        let id = refs.gen(RefType::CidFont(font_index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(pdf_writer::types::CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(font_descriptor_id);

        let metrics = self.glyph_metrics(&self.glyph_ids());
        let scaling = 1000.0 / self.face.as_face_ref().units_per_em() as f32;

        // the most common advance becomes the default width
        let mut width_counts: HashMap<u16, usize> = HashMap::new();
        for &(width, _) in metrics.values() {
            *width_counts.entry(width).or_insert(0) += 1;
        }
        let default_width = width_counts
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(&width, _)| width as f32 * scaling)
            .unwrap_or(1000.0);

        let mut id_widths: Vec<(u16, f32)> = metrics
            .iter()
            .map(|(&cid, &(width, _))| (cid, width as f32 * scaling))
            .collect();
        id_widths.sort_by_key(|&(id, _)| id);

        let mut widths = cid_font.widths();
        widths.consecutive(0, [1000.0]);
        let mut start_cid: u16 = 0;
        let mut run: Vec<f32> = Vec::new();
        for (cid, width) in id_widths {
            if run.is_empty() || (cid - start_cid) as usize > run.len() {
                if !run.is_empty() {
                    widths.consecutive(start_cid, run.drain(..));
                }
                start_cid = cid;
            }
            run.push(width);
        }
        if !run.is_empty() {
            widths.consecutive(start_cid, run);
        }
        widths.finish();

        cid_font.default_width(default_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_font_data(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::FontData(font_index));

        writer
            .stream(id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let font_data_stream_id = self.write_font_data(refs, font_index, writer);

        let face = self.face.as_face_ref();
        let metrics = self.glyph_metrics(&self.glyph_ids());
        let max_width = metrics.values().map(|&(w, _)| w).max().unwrap_or_default();
        let max_height = metrics.values().map(|&(_, h)| h).max().unwrap_or_default();
        let sum_width: usize = metrics.values().map(|&(w, _)| w as usize).sum();
        let avg_width = sum_width as f32 / metrics.len().max(1) as f32;

        let id = refs.gen(RefType::FontDescriptor(font_index));

        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(self.name().as_bytes()));
        descriptor.family(Str(self.family().as_bytes()));
        descriptor.weight(face.weight().to_number());

        let mut flags: FontFlags = FontFlags::empty();
        if face.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        descriptor.flags(flags);

        let scaling = 1000.0 / face.units_per_em() as f32;
        descriptor.bbox(pdf_writer::Rect {
            x1: 0.0,
            y1: 0.0,
            x2: sum_width as f32 * scaling,
            y2: max_height as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(1000.0),
        );
        descriptor.x_height(
            face.x_height()
                .unwrap_or_else(|| face.capital_height().unwrap_or_default()) as f32
                * scaling,
        );
        // no reliable source for stem widths in a TrueType face
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width * scaling);
        descriptor.max_width(max_width as f32 * scaling);
        descriptor.missing_width(max_width as f32 * scaling);

        descriptor.font_file2(font_data_stream_id);

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map: String = r#"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
"#
        .replace("\r\n", "\n");

        let mut ids: Vec<(u16, char)> = self.glyph_ids().into_iter().collect();
        ids.sort_by_key(|&(id, _)| id);

        // bfchar blocks share a high byte and hold at most 100 entries
        let mut blocks: Vec<Vec<(u16, char)>> = Vec::new();
        let mut current: Vec<(u16, char)> = Vec::new();
        let mut high_byte: u8 = 0;
        for (id, ch) in ids {
            if (id >> 8) as u8 != high_byte || current.len() >= 100 {
                blocks.push(std::mem::take(&mut current));
                high_byte = (id >> 8) as u8;
            }
            current.push((id, ch));
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        for block in blocks.into_iter().filter(|block| !block.is_empty()) {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for (id, ch) in block {
                let ch: u32 = ch.into();
                map.push_str(&format!("<{id:04x}> <{ch:04x}>\n"));
            }
            map.push_str("endbfchar\n");
        }

        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(pdf_writer::Filter::FlateDecode);

        id
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let font_index = id.index();
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }
}
