//! TrueType font subsetting: reduce a full font binary to exactly the glyphs
//! a text needs, plus `.notdef` and a small safety set, so exported documents
//! stay small while glyph outlines are preserved byte-for-byte.
//!
//! The subsetter reads the source font through [owned_ttf_parser] and writes
//! a fresh sfnt with `glyf`/`loca`/`hmtx`/`cmap` rebuilt over densely
//! re-indexed glyphs. Font-wide tables (`head`, `hhea`, `maxp`, `OS/2`,
//! hinting programs) are carried over so metrics match the original exactly.
//! CFF-flavoured fonts have no `glyf` table and are rejected; callers may
//! fall back to embedding the full font.

use crate::error::CopybookError;
use owned_ttf_parser::{Face, GlyphId, Tag};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Characters always retained regardless of the text: space plus digits,
/// cheap to keep and common in headers/footers added after the fact.
const SAFETY_CHARS: &str = " 0123456789";

/// Produce a minimal standalone font containing only the glyphs `text`
/// needs. Characters the font cannot map are skipped (they render as
/// `.notdef` at draw time); a font that cannot be subset at all is an error.
pub fn subset(font_data: &[u8], text: &str) -> Result<Vec<u8>, CopybookError> {
    let face = Face::parse(font_data, 0)?;
    let tables = SourceTables::extract(&face)?;

    // unique code points, .notdef implicit via glyph order
    let mut chars: BTreeSet<char> = text.chars().collect();
    chars.extend(SAFETY_CHARS.chars());

    let mut mapped: Vec<(char, u16)> = Vec::with_capacity(chars.len());
    for ch in chars {
        match face.glyph_index(ch) {
            Some(gid) => mapped.push((ch, gid.0)),
            None => log::debug!("no glyph for U+{:04X}, will render as .notdef", ch as u32),
        }
    }

    // closure over composite components so every referenced outline survives
    let mut keep: BTreeSet<u16> = mapped.iter().map(|&(_, gid)| gid).collect();
    keep.insert(0);
    let mut stack: Vec<u16> = keep.iter().copied().collect();
    while let Some(gid) = stack.pop() {
        let data = tables.glyph_data(gid)?;
        for (_, component) in component_entries(data)? {
            if keep.insert(component) {
                stack.push(component);
            }
        }
    }

    // dense re-indexing, .notdef first
    let order: Vec<u16> = std::iter::once(0)
        .chain(keep.iter().copied().filter(|&gid| gid != 0))
        .collect();
    let new_ids: HashMap<u16, u16> = order
        .iter()
        .enumerate()
        .map(|(new, &old)| (old, new as u16))
        .collect();

    // glyf + loca (long format), with composite component ids rewritten
    let mut glyf: Vec<u8> = Vec::new();
    let mut loca: Vec<u8> = Vec::with_capacity((order.len() + 1) * 4);
    for &old in &order {
        loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());
        let mut data = tables.glyph_data(old)?.to_vec();
        for (offset, component) in component_entries(&data)? {
            let new = new_ids
                .get(&component)
                .copied()
                .ok_or_else(|| CopybookError::font_subset("composite component escaped closure"))?;
            data[offset..offset + 2].copy_from_slice(&new.to_be_bytes());
        }
        glyf.extend_from_slice(&data);
        if glyf.len() % 2 != 0 {
            glyf.push(0);
        }
    }
    loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());

    // hmtx with one full metric per glyph
    let mut hmtx: Vec<u8> = Vec::with_capacity(order.len() * 4);
    for &old in &order {
        let advance = face.glyph_hor_advance(GlyphId(old)).unwrap_or(0);
        let lsb = face.glyph_hor_side_bearing(GlyphId(old)).unwrap_or(0);
        hmtx.extend_from_slice(&advance.to_be_bytes());
        hmtx.extend_from_slice(&lsb.to_be_bytes());
    }

    let cmap = {
        let mut mappings: Vec<(u16, u16)> = mapped
            .iter()
            .filter(|&&(ch, _)| (ch as u32) < 0xFFFF)
            .map(|&(ch, old)| (ch as u16, new_ids[&old]))
            .collect();
        mappings.sort_unstable();
        build_cmap_format4(&mappings)
    };

    // head: zero the checksum adjustment, force long loca offsets
    let mut head = tables.head.to_vec();
    head[8..12].copy_from_slice(&[0; 4]);
    head[50..52].copy_from_slice(&1i16.to_be_bytes());

    let mut hhea = tables.hhea.to_vec();
    hhea[34..36].copy_from_slice(&(order.len() as u16).to_be_bytes());

    let mut maxp = tables.maxp.to_vec();
    maxp[4..6].copy_from_slice(&(order.len() as u16).to_be_bytes());

    let family = face
        .names()
        .into_iter()
        .find(|name| name.name_id == owned_ttf_parser::name_id::FAMILY && name.is_unicode())
        .and_then(|name| name.to_string())
        .unwrap_or_else(|| "Copybook Subset".to_string());

    let mut builder = SfntBuilder::default();
    builder.add(b"head", head);
    builder.add(b"hhea", hhea);
    builder.add(b"maxp", maxp);
    builder.add(b"hmtx", hmtx);
    builder.add(b"cmap", cmap);
    builder.add(b"loca", loca);
    builder.add(b"glyf", glyf);
    builder.add(b"name", build_name(&family));
    builder.add(b"post", build_post(tables.post));
    // carried verbatim: font-wide metrics and hinting programs stay valid
    // for any subset of the glyphs
    for tag in [b"OS/2", b"cvt ", b"fpgm", b"prep"] {
        if let Some(data) = face.raw_face().table(Tag::from_bytes(tag)) {
            builder.add(tag, data.to_vec());
        }
    }

    let output = builder.build();
    log::info!(
        "subset {} glyphs of {} ({} -> {} bytes)",
        order.len(),
        face.number_of_glyphs(),
        font_data.len(),
        output.len(),
    );
    Ok(output)
}

/// Raw source tables the subsetter reads directly.
struct SourceTables<'a> {
    glyf: &'a [u8],
    loca: &'a [u8],
    head: &'a [u8],
    hhea: &'a [u8],
    maxp: &'a [u8],
    post: Option<&'a [u8]>,
    long_loca: bool,
    num_glyphs: u16,
}

impl<'a> SourceTables<'a> {
    fn extract(face: &'a Face<'a>) -> Result<SourceTables<'a>, CopybookError> {
        let raw = face.raw_face();
        let table = |tag: &[u8; 4]| {
            raw.table(Tag::from_bytes(tag)).ok_or_else(|| {
                CopybookError::font_subset(format!(
                    "missing required table {:?}",
                    String::from_utf8_lossy(tag)
                ))
            })
        };
        let glyf = raw.table(Tag::from_bytes(b"glyf")).ok_or_else(|| {
            CopybookError::font_subset("font has no glyf table (CFF outlines are not supported)")
        })?;
        let head = table(b"head")?;
        let hhea = table(b"hhea")?;
        let maxp = table(b"maxp")?;
        let loca = table(b"loca")?;
        if head.len() < 54 || hhea.len() < 36 || maxp.len() < 6 {
            return Err(CopybookError::font_subset("malformed head/hhea/maxp table"));
        }
        Ok(SourceTables {
            glyf,
            loca,
            head,
            hhea,
            maxp,
            post: raw.table(Tag::from_bytes(b"post")),
            long_loca: i16::from_be_bytes([head[50], head[51]]) == 1,
            num_glyphs: u16::from_be_bytes([maxp[4], maxp[5]]),
        })
    }

    /// Raw outline bytes of one glyph; empty for glyphs with no outline.
    fn glyph_data(&self, gid: u16) -> Result<&'a [u8], CopybookError> {
        if gid >= self.num_glyphs {
            return Err(CopybookError::font_subset(format!("glyph id {gid} out of range")));
        }
        let i = gid as usize;
        let (start, end) = if self.long_loca {
            (read_u32(self.loca, i * 4)? as usize, read_u32(self.loca, i * 4 + 4)? as usize)
        } else {
            (
                read_u16(self.loca, i * 2)? as usize * 2,
                read_u16(self.loca, i * 2 + 2)? as usize * 2,
            )
        };
        if start > end || end > self.glyf.len() {
            return Err(CopybookError::font_subset(format!("corrupt loca entry for glyph {gid}")));
        }
        Ok(&self.glyf[start..end])
    }
}

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// For composite glyph data, the byte offset and glyph id of every component
/// reference; empty for simple or blank glyphs.
fn component_entries(data: &[u8]) -> Result<Vec<(usize, u16)>, CopybookError> {
    if data.len() < 10 || i16::from_be_bytes([data[0], data[1]]) >= 0 {
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    let mut offset = 10usize;
    loop {
        let flags = read_u16(data, offset)?;
        let component = read_u16(data, offset + 2)?;
        entries.push((offset + 2, component));
        offset += 4;
        offset += if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        if flags & WE_HAVE_A_SCALE != 0 {
            offset += 2;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            offset += 4;
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            offset += 8;
        }
        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }
    Ok(entries)
}

/// A format 4 cmap with a single windows-unicode subtable over the given
/// sorted `(code point, glyph id)` pairs.
fn build_cmap_format4(mappings: &[(u16, u16)]) -> Vec<u8> {
    // consecutive code point runs become segments
    let mut segments: Vec<(u16, u16, Vec<u16>)> = Vec::new();
    for &(code, gid) in mappings {
        match segments.last_mut() {
            Some((_, end, gids)) if code == *end + 1 => {
                *end = code;
                gids.push(gid);
            }
            _ => segments.push((code, code, vec![gid])),
        }
    }
    // format 4 requires a terminal 0xFFFF segment
    segments.push((0xFFFF, 0xFFFF, Vec::new()));

    let seg_count = segments.len() as u16;
    let seg_count_x2 = seg_count * 2;
    let entry_selector = (seg_count as f32).log2().floor() as u16;
    let search_range = 2 * (1u16 << entry_selector);
    let range_shift = seg_count_x2 - search_range;

    let mut end_codes = Vec::new();
    let mut start_codes = Vec::new();
    let mut id_deltas: Vec<i16> = Vec::new();
    let mut id_range_offsets: Vec<u16> = Vec::new();
    let mut glyph_id_array: Vec<u16> = Vec::new();
    for (i, (start, end, gids)) in segments.iter().enumerate() {
        start_codes.push(*start);
        end_codes.push(*end);
        if gids.is_empty() {
            // final 0xFFFF sentinel maps through delta arithmetic to .notdef
            id_deltas.push(1);
            id_range_offsets.push(0);
        } else {
            id_deltas.push(0);
            let array_index = glyph_id_array.len() as u16;
            id_range_offsets.push(2 * (seg_count - i as u16 + array_index));
            glyph_id_array.extend_from_slice(gids);
        }
    }

    let subtable_len = 16 + 8 * seg_count as usize + 2 * glyph_id_array.len();
    let mut out = Vec::with_capacity(12 + subtable_len);
    // cmap header: one encoding record, windows unicode BMP
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&3u16.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&12u32.to_be_bytes());
    // format 4 subtable
    out.extend_from_slice(&4u16.to_be_bytes());
    out.extend_from_slice(&(subtable_len as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&seg_count_x2.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());
    for code in &end_codes {
        out.extend_from_slice(&code.to_be_bytes());
    }
    out.extend_from_slice(&0u16.to_be_bytes());
    for code in &start_codes {
        out.extend_from_slice(&code.to_be_bytes());
    }
    for delta in &id_deltas {
        out.extend_from_slice(&delta.to_be_bytes());
    }
    for offset in &id_range_offsets {
        out.extend_from_slice(&offset.to_be_bytes());
    }
    for gid in &glyph_id_array {
        out.extend_from_slice(&gid.to_be_bytes());
    }
    out
}

/// Minimal windows-unicode name table: family, subfamily, full and
/// postscript names, all derived from the source family.
fn build_name(family: &str) -> Vec<u8> {
    let postscript: String = family.chars().filter(|c| !c.is_whitespace()).collect();
    let entries: [(u16, &str); 4] = [
        (1, family),
        (2, "Regular"),
        (4, family),
        (6, &postscript),
    ];

    let mut storage: Vec<u8> = Vec::new();
    let mut records: Vec<u8> = Vec::new();
    for (name_id, value) in entries {
        let offset = storage.len() as u16;
        for unit in value.encode_utf16() {
            storage.extend_from_slice(&unit.to_be_bytes());
        }
        let length = storage.len() as u16 - offset;
        for field in [3u16, 1, 0x0409, name_id, length, offset] {
            records.extend_from_slice(&field.to_be_bytes());
        }
    }

    let mut out = Vec::with_capacity(6 + records.len() + storage.len());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_be_bytes());
    out.extend_from_slice(&(6 + records.len() as u16).to_be_bytes());
    out.extend_from_slice(&records);
    out.extend_from_slice(&storage);
    out
}

/// Version 3.0 post table (no glyph names), carrying the source's slant and
/// underline metrics when available.
fn build_post(source: Option<&[u8]>) -> Vec<u8> {
    let mut out = Vec::with_capacity(32);
    out.extend_from_slice(&0x0003_0000u32.to_be_bytes());
    match source {
        Some(post) if post.len() >= 16 => out.extend_from_slice(&post[4..16]),
        _ => out.extend_from_slice(&[0; 12]),
    }
    out.extend_from_slice(&[0; 16]);
    out
}

/// Assembles tables into an sfnt binary: sorted directory, per-table
/// checksums, and the whole-font checksum adjustment written back into
/// `head`.
#[derive(Default)]
pub(crate) struct SfntBuilder {
    tables: BTreeMap<[u8; 4], Vec<u8>>,
}

impl SfntBuilder {
    pub(crate) fn add(&mut self, tag: &[u8; 4], data: Vec<u8>) {
        self.tables.insert(*tag, data);
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let num_tables = self.tables.len() as u16;
        let entry_selector = (num_tables as f32).log2().floor() as u16;
        let search_range = 16 * (1u16 << entry_selector);

        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&num_tables.to_be_bytes());
        out.extend_from_slice(&search_range.to_be_bytes());
        out.extend_from_slice(&entry_selector.to_be_bytes());
        out.extend_from_slice(&(num_tables * 16 - search_range).to_be_bytes());

        let directory_len = 12 + self.tables.len() * 16;
        let mut offset = directory_len;
        let mut head_offset = None;
        for (tag, data) in &self.tables {
            out.extend_from_slice(tag);
            out.extend_from_slice(&table_checksum(data).to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            if tag == b"head" {
                head_offset = Some(offset);
            }
            offset += data.len().div_ceil(4) * 4;
        }
        for data in self.tables.values() {
            out.extend_from_slice(data);
            while out.len() % 4 != 0 {
                out.push(0);
            }
        }

        if let Some(head_offset) = head_offset {
            let adjustment = 0xB1B0_AFBAu32.wrapping_sub(table_checksum(&out));
            out[head_offset + 8..head_offset + 12].copy_from_slice(&adjustment.to_be_bytes());
        }
        out
    }
}

fn table_checksum(data: &[u8]) -> u32 {
    let mut sum = 0u32;
    for chunk in data.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(word));
    }
    sum
}

fn read_u16(data: &[u8], offset: usize) -> Result<u16, CopybookError> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| CopybookError::font_subset("unexpected end of table"))
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32, CopybookError> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| CopybookError::font_subset("unexpected end of table"))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds a valid little test font with the given character-to-outline
    /// assignments, using the same sfnt primitives as the subsetter.
    pub(crate) fn test_font(chars: &[char]) -> Vec<u8> {
        // one triangular contour per glyph, distinct apex per index
        fn simple_glyph(apex: u8) -> Vec<u8> {
            let mut g: Vec<u8> = Vec::new();
            g.extend_from_slice(&1i16.to_be_bytes());
            for coord in [0i16, 0, 500, 500] {
                g.extend_from_slice(&coord.to_be_bytes());
            }
            g.extend_from_slice(&2u16.to_be_bytes()); // end point of contour 0
            g.extend_from_slice(&0u16.to_be_bytes()); // no instructions
            // on-curve, short positive x and y for all three points
            g.extend_from_slice(&[0x37, 0x37, 0x37]);
            g.extend_from_slice(&[10, 200, apex]); // x deltas
            g.extend_from_slice(&[10, 0, 240]); // y deltas
            g.push(0); // pad to even
            g
        }

        let glyph_count = 1 + chars.len();
        let mut glyf: Vec<u8> = Vec::new();
        let mut loca: Vec<u8> = Vec::new();
        for i in 0..glyph_count {
            loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());
            glyf.extend_from_slice(&simple_glyph(20 + i as u8));
        }
        loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());

        let mut head = Vec::new();
        head.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
        head.extend_from_slice(&0u32.to_be_bytes()); // revision
        head.extend_from_slice(&0u32.to_be_bytes()); // checksum adj
        head.extend_from_slice(&0x5F0F_3CF5u32.to_be_bytes()); // magic
        head.extend_from_slice(&0u16.to_be_bytes()); // flags
        head.extend_from_slice(&1000u16.to_be_bytes()); // units per em
        head.extend_from_slice(&[0; 16]); // created + modified
        for coord in [0i16, 0, 500, 500] {
            head.extend_from_slice(&coord.to_be_bytes());
        }
        head.extend_from_slice(&0u16.to_be_bytes()); // mac style
        head.extend_from_slice(&8u16.to_be_bytes()); // lowest rec ppem
        head.extend_from_slice(&2i16.to_be_bytes()); // font direction hint
        head.extend_from_slice(&1i16.to_be_bytes()); // long loca
        head.extend_from_slice(&0i16.to_be_bytes()); // glyph data format

        let mut hhea = Vec::new();
        hhea.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        hhea.extend_from_slice(&800i16.to_be_bytes()); // ascender
        hhea.extend_from_slice(&(-200i16).to_be_bytes()); // descender
        hhea.extend_from_slice(&0i16.to_be_bytes()); // line gap
        hhea.extend_from_slice(&600u16.to_be_bytes()); // max advance
        hhea.extend_from_slice(&[0; 20]); // bearings, extents, carets, reserved
        hhea.extend_from_slice(&0i16.to_be_bytes()); // metric data format
        hhea.extend_from_slice(&(glyph_count as u16).to_be_bytes());

        let mut maxp = Vec::new();
        maxp.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        maxp.extend_from_slice(&(glyph_count as u16).to_be_bytes());
        for limit in [3u16, 1, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0] {
            maxp.extend_from_slice(&limit.to_be_bytes());
        }

        let mut hmtx = Vec::new();
        for _ in 0..glyph_count {
            hmtx.extend_from_slice(&600u16.to_be_bytes());
            hmtx.extend_from_slice(&10i16.to_be_bytes());
        }

        let mappings: Vec<(u16, u16)> = chars
            .iter()
            .enumerate()
            .map(|(i, &ch)| (ch as u16, (i + 1) as u16))
            .collect();
        let mut sorted = mappings.clone();
        sorted.sort_unstable();

        let mut builder = SfntBuilder::default();
        builder.add(b"head", head);
        builder.add(b"hhea", hhea);
        builder.add(b"maxp", maxp);
        builder.add(b"hmtx", hmtx);
        builder.add(b"loca", loca);
        builder.add(b"glyf", glyf);
        builder.add(b"cmap", build_cmap_format4(&sorted));
        builder.add(b"name", build_name("Fixture Sans"));
        builder.add(b"post", build_post(None));
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::test_font;
    use super::*;
    use owned_ttf_parser::Face;

    #[test]
    fn fixture_font_parses() {
        let font = test_font(&['A', 'B', 'C']);
        let face = Face::parse(&font, 0).unwrap();
        assert_eq!(face.number_of_glyphs(), 4);
        assert_eq!(face.glyph_index('B').map(|g| g.0), Some(2));
        assert_eq!(face.units_per_em(), 1000);
        // horizontal header and metrics must be readable, not just present
        assert_eq!(face.ascender(), 800);
        assert_eq!(face.descender(), -200);
        let gid = face.glyph_index('A').unwrap();
        assert_eq!(face.glyph_hor_advance(gid), Some(600));
    }

    #[test]
    fn subset_keeps_only_needed_glyphs() {
        let font = test_font(&['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H']);
        let out = subset(&font, "A").unwrap();
        let face = Face::parse(&out, 0).unwrap();
        // .notdef + 'A'; space and digits are unmapped in the fixture
        assert_eq!(face.number_of_glyphs(), 2);
        assert_eq!(face.glyph_index('A').map(|g| g.0), Some(1));
        assert_eq!(face.glyph_index('B'), None);
    }

    #[test]
    fn subset_is_smaller_than_source() {
        let font = test_font(&['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H']);
        let out = subset(&font, "AB").unwrap();
        assert!(out.len() < font.len());
    }

    #[test]
    fn subset_preserves_metrics_and_outline_bytes() {
        let font = test_font(&['A', 'B', 'C']);
        let out = subset(&font, "C").unwrap();
        let source = Face::parse(&font, 0).unwrap();
        let face = Face::parse(&out, 0).unwrap();
        assert_eq!(face.units_per_em(), source.units_per_em());
        assert_eq!(face.ascender(), source.ascender());
        assert_eq!(face.descender(), source.descender());
        let gid = face.glyph_index('C').unwrap();
        assert_eq!(face.glyph_hor_advance(gid), Some(600));
        let old = source.glyph_index('C').unwrap();
        assert_eq!(
            face.glyph_bounding_box(gid),
            source.glyph_bounding_box(old),
        );
    }

    #[test]
    fn unmapped_chars_are_skipped_not_fatal() {
        let font = test_font(&['A']);
        let out = subset(&font, "A字B").unwrap();
        let face = Face::parse(&out, 0).unwrap();
        assert_eq!(face.number_of_glyphs(), 2);
        assert_eq!(face.glyph_index('字'), None);
    }

    #[test]
    fn corrupt_input_fails_cleanly() {
        assert!(subset(&[0u8; 64], "字").is_err());
        assert!(subset(b"not a font at all", "字").is_err());
    }

    #[test]
    fn cmap_binary_search_fields() {
        // segments: A-C run, X singleton, final sentinel
        let cmap = build_cmap_format4(&[(65, 1), (66, 2), (67, 3), (88, 4)]);
        let seg_count_x2 = u16::from_be_bytes([cmap[18], cmap[19]]);
        assert_eq!(seg_count_x2, 6);
        let search_range = u16::from_be_bytes([cmap[20], cmap[21]]);
        assert_eq!(search_range, 4);
    }

    #[test]
    fn checksum_pads_trailing_bytes() {
        assert_eq!(table_checksum(&[0, 0, 0, 1]), 1);
        assert_eq!(table_checksum(&[0, 0, 0, 1, 0, 0, 0]), 1);
        assert_eq!(table_checksum(&[0x80, 0, 0, 0, 0x80, 0, 0, 0]), 0);
    }
}
