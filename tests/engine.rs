//! End-to-end runs of the full pipeline: content parsing, layout,
//! pagination and PDF export working together.

use copybook_gen::{
    export, layout::Strategy, page_capacity, paginate, BorderMode, ColumnOrder, Direction,
    ExportRequest, FixedGrid, GridDecoration, LayoutConfig, StructuredContent, UNBOUNDED,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn structured_json_flows_through_layout() {
    init_logging();
    let content = StructuredContent::from_json(
        r#"{"paragraphs":[
            {"type":"preface","lines":["静夜思"]},
            {"lines":["床前明月光","疑是地上霜","举头望明月","低头思故乡"]}
        ]}"#,
    )
    .unwrap();
    assert_eq!(content.char_count(), 23);

    let config = LayoutConfig::default();
    let layout = Strategy::GridStandard.calculate(&content, &config).unwrap();
    assert_eq!(layout.items.len(), 23);
    assert!(layout.total_height > 0.0);

    // the viewport query sees exactly what a full scan would
    let all = layout.viewport_items(0.0, layout.total_height + 1000.0);
    assert_eq!(all.len(), layout.items.len());
}

#[test]
fn vertical_rtl_layout_paginates_with_mirrored_columns() {
    init_logging();
    let content = StructuredContent::from_plain_text("床前明月光疑是地上霜");
    let config = LayoutConfig {
        direction: Direction::Vertical,
        column_order: ColumnOrder::Rtl,
        rows: 5,
        columns: UNBOUNDED,
        ..LayoutConfig::default()
    };
    let layout = Strategy::GridStandard.calculate(&content, &config).unwrap();

    let capacity = copybook_gen::PageCapacity {
        rows: 5,
        cols: 2,
        scale: 1.0,
    };
    let cells = paginate(
        &layout.items,
        capacity,
        Direction::Vertical,
        ColumnOrder::Rtl,
        true,
    )
    .unwrap();
    // the first reading column sits on the right edge of the page
    assert_eq!(cells.iter().filter(|c| c.ch.is_some()).count(), 10);
    let first = cells.iter().find(|c| c.ch == Some('床')).unwrap();
    assert_eq!(first.visual_col, 1);
    assert_eq!(first.visual_row, 0);
}

#[test]
fn decoration_sheet_exports_without_a_font() {
    init_logging();
    let request = ExportRequest {
        config: LayoutConfig {
            decoration: GridDecoration::Huigong,
            border_mode: BorderMode::Full,
            ..LayoutConfig::default()
        },
        ..ExportRequest::default()
    };
    let bytes = export(&request).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/FlateDecode"));
    assert!(text.contains("/Count 1"));
}

#[test]
fn fixed_grid_export_capacity_is_authoritative() {
    init_logging();
    let config = LayoutConfig {
        fixed_grid: Some(FixedGrid { rows: 4, cols: 4 }),
        ..LayoutConfig::default()
    };
    let capacity = page_capacity(&config).unwrap();
    assert_eq!((capacity.rows, capacity.cols), (4, 4));
    assert!(capacity.scale > 0.0);

    let request = ExportRequest {
        config,
        ..ExportRequest::default()
    };
    let bytes = export(&request).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn smart_snap_shapes_the_grid_to_the_poem() {
    init_logging();
    let text = "白日依山尽，黄河入海流。欲穷千里目，更上一层楼。";
    let config = LayoutConfig {
        smart_snap: true,
        ..LayoutConfig::default()
    };
    // a container wide enough for 10 cells snaps down to the poem's 6
    let grid = copybook_gen::grid::compute(text, 1200.0, 800.0, 80.0, &config).unwrap();
    assert_eq!(grid.cols, 6);
    assert_eq!(grid.rows, 4);
}

#[test]
fn config_round_trips_through_json() {
    init_logging();
    let config = LayoutConfig {
        direction: Direction::Vertical,
        border_mode: BorderMode::LinesOnly,
        decoration: GridDecoration::Tianzi,
        ..LayoutConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"vertical\""));
    assert!(json.contains("\"lines-only\""));
    let back: LayoutConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
