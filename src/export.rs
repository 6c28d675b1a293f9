//! Export orchestration: turn structured content plus a layout configuration
//! into a finished PDF, optionally on a worker thread.
//!
//! Geometry mirrors the on-screen canvas: layout runs in canvas pixels at
//! 96 dpi, and every length is converted to points only when written into
//! the page. Pages are A4 portrait with a uniform margin; the grid is
//! centred horizontally and anchored to the top margin.

use crate::colour::{colours, Colour};
use crate::config::{BorderMode, Direction, GridDecoration, LayoutConfig, UNBOUNDED};
use crate::content::StructuredContent;
use crate::document::Document;
use crate::error::CopybookError;
use crate::font::Font;
use crate::grid;
use crate::info::Info;
use crate::layout::Strategy;
use crate::page::{Margins, Page, PageContents, SpanFont, SpanLayout};
use crate::paginate::{paginate, PageCapacity, PlacedCell};
use crate::pagesize;
use crate::subset;
use crate::units::{Mm, Pt};
use std::io::Write;

/// Canvas pixels per millimetre (96 dpi)
pub const MM_TO_PX: f32 = 3.7795;

/// Uniform page margin
const PAGE_MARGIN: Mm = Mm(15.0);

/// Drawn glyph size as a fraction of the cell edge
const FONT_RATIO: f32 = 0.55;

/// Baseline sits this fraction of the font size below the cell's vertical
/// centre, approximating the visual centring of CJK glyphs
const BASELINE_DROP: f32 = 1.0 / 2.8;

fn px_to_pt(px: f32) -> Pt {
    Pt::from(Mm(px / MM_TO_PX))
}

/// Progress milestones reported while an export runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    FontReady,
    LaidOut,
    PagesDrawn,
    Serialized,
    Done,
    Failed,
}

/// Everything one export needs. The layout configuration's row/column
/// capacities are ignored; the page geometry decides how many cells fit.
pub struct ExportRequest {
    pub content: StructuredContent,
    pub config: LayoutConfig,
    /// Raw TTF bytes; required whenever the content has characters to draw,
    /// unless `allow_fontless` is set
    pub font_data: Option<Vec<u8>>,
    /// Layout strategy override; grid placement when unset
    pub strategy: Option<Strategy>,
    /// Export without a font, leaving character cells as empty practice cells
    pub allow_fontless: bool,
    /// Embed the whole font when subsetting fails (e.g. CFF outlines)
    pub fall_back_to_full_font: bool,
    /// Complete every page's grid with empty practice cells
    pub fill_blank: bool,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl Default for ExportRequest {
    fn default() -> ExportRequest {
        ExportRequest {
            content: StructuredContent::default(),
            config: LayoutConfig::default(),
            font_data: None,
            strategy: None,
            allow_fontless: false,
            fall_back_to_full_font: true,
            fill_blank: true,
            title: None,
            author: None,
        }
    }
}

/// How many cells one page holds for this configuration.
///
/// A fixed grid is authoritative and is scaled (up or down) to fill the
/// usable page area; otherwise the page is packed with as many nominal-size
/// cells as fit.
pub fn page_capacity(config: &LayoutConfig) -> Result<PageCapacity, CopybookError> {
    let usable_w_px = (Mm::from(pagesize::A4.0).0 - 2.0 * PAGE_MARGIN.0) * MM_TO_PX;
    let usable_h_px = (Mm::from(pagesize::A4.1).0 - 2.0 * PAGE_MARGIN.0) * MM_TO_PX;
    let gap = grid::gap_for(config.border_mode);
    let cell = config.cell_size;

    if let Some(fixed) = config.fixed_grid {
        if fixed.rows == 0 || fixed.cols == 0 {
            return Err(CopybookError::invalid_configuration(
                "fixed grid needs at least one row and one column",
            ));
        }
        let grid_w = fixed.cols as f32 * cell + (fixed.cols - 1) as f32 * gap;
        let grid_h = fixed.rows as f32 * cell + (fixed.rows - 1) as f32 * gap;
        let scale = (usable_w_px / grid_w).min(usable_h_px / grid_h);
        return Ok(PageCapacity {
            rows: fixed.rows,
            cols: fixed.cols,
            scale,
        });
    }

    let cols = ((usable_w_px + gap) / (cell + gap)).floor() as usize;
    let rows = ((usable_h_px + gap) / (cell + gap)).floor() as usize;
    if rows == 0 || cols == 0 {
        return Err(CopybookError::invalid_configuration(format!(
            "cell size {cell} does not fit the page"
        )));
    }
    Ok(PageCapacity {
        rows,
        cols,
        scale: 1.0,
    })
}

/// Run an export to completion, returning the serialized PDF bytes.
pub fn export(request: &ExportRequest) -> Result<Vec<u8>, CopybookError> {
    export_with_progress(request, |_| {})
}

/// [export], reporting each [ExportPhase] as it is reached.
pub fn export_with_progress(
    request: &ExportRequest,
    mut progress: impl FnMut(ExportPhase),
) -> Result<Vec<u8>, CopybookError> {
    progress(ExportPhase::Idle);
    let result = run(request, &mut progress);
    match &result {
        Ok(bytes) => {
            log::info!("export finished: {} bytes", bytes.len());
            progress(ExportPhase::Done);
        }
        Err(err) => {
            log::error!("export failed: {err}");
            progress(ExportPhase::Failed);
        }
    }
    result
}

fn run(
    request: &ExportRequest,
    progress: &mut impl FnMut(ExportPhase),
) -> Result<Vec<u8>, CopybookError> {
    request.config.validate()?;
    let capacity = page_capacity(&request.config)?;

    let font = prepare_font(request)?;
    progress(ExportPhase::FontReady);

    // re-run the layout with the page's capacity on the reading axis and the
    // other axis left wide open, so pagination can chunk whole lines
    let mut layout_config = request.config.clone();
    layout_config.fixed_grid = None;
    match layout_config.direction {
        Direction::Vertical => {
            layout_config.rows = capacity.rows;
            layout_config.columns = UNBOUNDED;
        }
        Direction::Horizontal => {
            layout_config.columns = capacity.cols;
            layout_config.rows = UNBOUNDED;
        }
    }
    let strategy = request.strategy.unwrap_or(Strategy::GridStandard);
    let layout = strategy.calculate(&request.content, &layout_config)?;
    let cells = paginate(
        &layout.items,
        capacity,
        request.config.direction,
        request.config.column_order,
        request.fill_blank,
    )?;
    progress(ExportPhase::LaidOut);

    let document = draw_pages(request, capacity, &cells, font)?;
    progress(ExportPhase::PagesDrawn);

    let mut out: Vec<u8> = Vec::new();
    document.write(&mut out)?;
    progress(ExportPhase::Serialized);
    Ok(out)
}

/// Subset and load the request's font. The font may be omitted for
/// decoration-only sheets with nothing to draw, or when the request opts
/// into a fontless export.
fn prepare_font(request: &ExportRequest) -> Result<Option<Font>, CopybookError> {
    let Some(bytes) = &request.font_data else {
        if request.allow_fontless || request.content.char_count() == 0 {
            return Ok(None);
        }
        return Err(CopybookError::invalid_configuration(
            "font data is required to draw text",
        ));
    };

    let text = request.content.plain_text();
    let data = match subset::subset(bytes, &text) {
        Ok(data) => data,
        Err(err @ CopybookError::FontSubset { .. }) if request.fall_back_to_full_font => {
            log::warn!("{err}; embedding the full font instead");
            bytes.clone()
        }
        Err(err) => return Err(err),
    };
    Font::load(data).map(Some)
}

/// Per-page cell geometry, all in points.
struct PageGeometry {
    cell: Pt,
    step: Pt,
    origin_x: Pt,
    origin_y: Pt,
}

impl PageGeometry {
    fn new(config: &LayoutConfig, capacity: PageCapacity) -> PageGeometry {
        let cell_px = config.cell_size * capacity.scale;
        let gap_px = grid::gap_for(config.border_mode) * capacity.scale;
        let grid_w_px = capacity.cols as f32 * cell_px + (capacity.cols - 1) as f32 * gap_px;

        let (page_w, page_h) = pagesize::A4;
        let margin = Pt::from(PAGE_MARGIN);
        let usable_w = page_w - margin - margin;
        let origin_x = margin + (usable_w - px_to_pt(grid_w_px)) * 0.5;
        PageGeometry {
            cell: px_to_pt(cell_px),
            step: px_to_pt(cell_px + gap_px),
            origin_x,
            origin_y: page_h - margin,
        }
    }

    /// Top-left corner of a cell in page space.
    fn cell_corner(&self, row: usize, col: usize) -> (Pt, Pt) {
        (
            self.origin_x + self.step * col as f32,
            self.origin_y - self.step * row as f32,
        )
    }
}

fn draw_pages(
    request: &ExportRequest,
    capacity: PageCapacity,
    cells: &[PlacedCell],
    font: Option<Font>,
) -> Result<Document, CopybookError> {
    let geometry = PageGeometry::new(&request.config, capacity);
    let font_size = geometry.cell * FONT_RATIO;
    let (page_w, page_h) = pagesize::A4;
    let margin = Pt::from(PAGE_MARGIN);

    let mut document = Document::default();
    let mut info = Info::new();
    if let Some(title) = &request.title {
        info.title(title);
    }
    if let Some(author) = &request.author {
        info.author(author);
    }
    document.set_info(info);

    let page_count = cells.iter().map(|cell| cell.page_index + 1).max().unwrap_or(0);

    for page_index in 0..page_count {
        let mut page = Page::new(page_w, page_h, Margins::all(margin));
        let on_page = cells.iter().filter(|cell| cell.page_index == page_index);

        let mut guides: Vec<u8> = Vec::new();
        let mut spans: Vec<SpanLayout> = Vec::new();
        for cell in on_page {
            let (left, top) = geometry.cell_corner(cell.visual_row, cell.visual_col);
            draw_cell_frame(&mut guides, left, top, geometry.cell, &request.config);

            if let (Some(ch), Some(font)) = (cell.ch, &font) {
                let text = ch.to_string();
                let width = font.width_of(&text, font_size);
                let x = left + (geometry.cell - width) * 0.5;
                let y = top - geometry.cell * 0.5 - font_size * BASELINE_DROP;
                spans.push(SpanLayout {
                    text,
                    // the ready font becomes the document's first (and only)
                    // arena entry below
                    font: SpanFont {
                        index: 0,
                        size: font_size,
                    },
                    colour: colours::BLACK,
                    coords: (x, y),
                });
            }
        }

        if !guides.is_empty() {
            page.add_raw(guides);
        }
        if !spans.is_empty() {
            page.contents.push(PageContents::Text(spans));
        }
        document.add_page(page);
    }

    if let Some(font) = font {
        document.add_font(font);
    }

    log::debug!("drew {page_count} pages at {}x{} cells", capacity.rows, capacity.cols);
    Ok(document)
}

/// Stroke one cell's border and guide lines into a content stream.
fn draw_cell_frame(ops: &mut Vec<u8>, left: Pt, top: Pt, cell: Pt, config: &LayoutConfig) {
    let Colour::RGB { r, g, b } = colours::GUIDE_RED else {
        unreachable!("guide colour is RGB");
    };
    let (x, y, size) = (left.0, top.0, cell.0);
    writeln!(ops, "{r} {g} {b} RG 0.75 w").expect("writing to a Vec cannot fail");

    match config.border_mode {
        BorderMode::Full => {
            writeln!(ops, "{x} {} {size} {size} re S", y - size)
                .expect("writing to a Vec cannot fail");
        }
        BorderMode::LinesOnly => {
            // vertical text separates columns, horizontal text separates rows
            match config.direction {
                Direction::Vertical => {
                    writeln!(ops, "{x} {y} m {x} {} l S", y - size)
                        .expect("writing to a Vec cannot fail");
                }
                Direction::Horizontal => {
                    writeln!(ops, "{x} {} m {} {} l S", y - size, x + size, y - size)
                        .expect("writing to a Vec cannot fail");
                }
            }
        }
        BorderMode::None => {}
    }

    let mut dashed: Vec<String> = Vec::new();
    let (mid_x, mid_y) = (x + size * 0.5, y - size * 0.5);
    match config.decoration {
        GridDecoration::Mizi => {
            dashed.push(format!("{x} {mid_y} m {} {mid_y} l S", x + size));
            dashed.push(format!("{mid_x} {y} m {mid_x} {} l S", y - size));
            dashed.push(format!("{x} {y} m {} {} l S", x + size, y - size));
            dashed.push(format!("{x} {} m {} {y} l S", y - size, x + size));
        }
        GridDecoration::Tianzi => {
            dashed.push(format!("{x} {mid_y} m {} {mid_y} l S", x + size));
            dashed.push(format!("{mid_x} {y} m {mid_x} {} l S", y - size));
        }
        GridDecoration::Huigong => {
            let inset = size * 0.25;
            dashed.push(format!(
                "{} {} {} {} re S",
                x + inset,
                y - size + inset,
                size - 2.0 * inset,
                size - 2.0 * inset
            ));
        }
        GridDecoration::None => {}
    }
    if !dashed.is_empty() {
        writeln!(ops, "[2 2] 0 d").expect("writing to a Vec cannot fail");
        for line in dashed {
            writeln!(ops, "{line}").expect("writing to a Vec cannot fail");
        }
        writeln!(ops, "[] 0 d").expect("writing to a Vec cannot fail");
    }
}

/// A handle to an export running on a background thread.
pub struct ExportHandle {
    receiver: crossbeam_channel::Receiver<Result<Vec<u8>, CopybookError>>,
}

impl ExportHandle {
    /// Block until the export finishes.
    pub fn wait(self) -> Result<Vec<u8>, CopybookError> {
        self.receiver.recv().map_err(|_| {
            CopybookError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "export worker disconnected",
            ))
        })?
    }

    /// Check for a finished export without blocking.
    pub fn try_wait(&self) -> Option<Result<Vec<u8>, CopybookError>> {
        self.receiver.try_recv().ok()
    }
}

/// Run an export off-thread, keeping the caller responsive. The result is
/// delivered through the returned handle.
pub fn spawn(request: ExportRequest) -> ExportHandle {
    let (sender, receiver) = crossbeam_channel::bounded(1);
    let spawned = std::thread::Builder::new()
        .name("copybook-export".into())
        .spawn(move || {
            let result = export(&request);
            if sender.send(result).is_err() {
                log::warn!("export result dropped: receiver went away");
            }
        });
    if let Err(err) = spawned {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let _ = sender.send(Err(err.into()));
        return ExportHandle { receiver };
    }
    ExportHandle { receiver }
}
