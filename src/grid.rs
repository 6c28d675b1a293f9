//! Grid sizing: decide how many rows and columns of cells a container holds.

use crate::config::{BorderMode, Direction, LayoutConfig};
use crate::error::CopybookError;

/// Edge of one practice cell in canvas pixels
pub const CELL_SIZE: f32 = 96.0;

/// Gap between cells when cell borders are drawn
pub const GRID_GAP: f32 = 3.0;

/// Derived grid dimensions for a container. Recomputed whenever the container
/// size, direction, fixed-grid override, or smart-snap toggle changes; never
/// mutated in place.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridDimensions {
    pub rows: usize,
    pub cols: usize,
    pub gap: f32,
    pub usable_width: f32,
    pub usable_height: f32,
}

/// Gap between cells for a border mode: bordered cells get breathing room,
/// borderless grids pack tight.
pub fn gap_for(border_mode: BorderMode) -> f32 {
    match border_mode {
        BorderMode::Full | BorderMode::LinesOnly => GRID_GAP,
        BorderMode::None => 0.0,
    }
}

/// Infer a poem's natural line length from its punctuation rhythm.
///
/// Splits the text on punctuation, whitespace and newlines, then takes the
/// length-frequency mode of the segments. Returns `Some(mode + 1)`, where the
/// extra cell accounts for the trailing punctuation mark, when the modal
/// length covers more than half the segments and lies in `2..=14`.
pub fn detect_smart_line_length(text: &str) -> Option<usize> {
    let segments: Vec<&str> = text
        .split(|c: char| {
            c.is_whitespace()
                || matches!(
                    c,
                    '，' | '。' | '！' | '？' | '；' | '：' | '、' | ',' | '.' | '!' | '?' | ';' | ':'
                )
        })
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        return None;
    }

    let mut freq: std::collections::HashMap<usize, usize> = std::collections::HashMap::new();
    for segment in &segments {
        *freq.entry(segment.chars().count()).or_insert(0) += 1;
    }
    let (&mode, &count) = freq.iter().max_by_key(|&(_, count)| *count)?;

    if count * 2 > segments.len() && (2..=14).contains(&mode) {
        log::debug!(
            "smart snap: modal segment length {mode} covers {count}/{} segments",
            segments.len()
        );
        Some(mode + 1)
    } else {
        None
    }
}

/// Decide rows/cols/gap for a container.
///
/// The fixed-grid override is authoritative on its direction's axis, with the
/// orthogonal axis derived from the text length. Otherwise the capacity that
/// physically fits wins, except that an accepted smart-snap proposal may
/// shrink the fill axis to the poem's natural line length.
pub fn compute(
    text: &str,
    container_width: f32,
    container_height: f32,
    padding: f32,
    config: &LayoutConfig,
) -> Result<GridDimensions, CopybookError> {
    let gap = gap_for(config.border_mode);
    let len = text.chars().filter(|c| !c.is_whitespace()).count();
    let vertical = config.direction == Direction::Vertical;

    let usable_width = (container_width - padding).max(0.0);
    let usable_height = (container_height - padding).max(0.0);

    if let Some(fixed) = config.fixed_grid {
        let (rows, cols) = if vertical {
            let rows = fixed.rows.max(1);
            (rows, (len.div_ceil(rows)).max(1))
        } else {
            let cols = fixed.cols.max(1);
            ((len.div_ceil(cols)).max(1), cols)
        };
        return Ok(GridDimensions {
            rows,
            cols,
            gap,
            usable_width,
            usable_height,
        });
    }

    let usable = if vertical { usable_height } else { usable_width };
    let max_fit = ((usable + gap) / (config.cell_size + gap)).floor() as usize;
    if max_fit == 0 {
        return Err(CopybookError::invalid_configuration(format!(
            "container {container_width}x{container_height} too small for a single {} px cell",
            config.cell_size
        )));
    }

    let smart = if config.smart_snap {
        detect_smart_line_length(text)
    } else {
        None
    };
    // A smart proposal is accepted only when it physically fits
    let fill = match smart {
        Some(proposed) if proposed <= max_fit => proposed,
        _ => max_fit,
    };

    let cross = (len.div_ceil(fill)).max(1);
    let (rows, cols) = if vertical { (fill, cross) } else { (cross, fill) };

    Ok(GridDimensions {
        rows,
        cols,
        gap,
        usable_width,
        usable_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedGrid;

    fn config(direction: Direction) -> LayoutConfig {
        LayoutConfig {
            direction,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn gap_follows_border_mode() {
        assert_eq!(gap_for(BorderMode::Full), GRID_GAP);
        assert_eq!(gap_for(BorderMode::LinesOnly), GRID_GAP);
        assert_eq!(gap_for(BorderMode::None), 0.0);
    }

    #[test]
    fn smart_length_of_regular_poem() {
        // four 5-char segments with trailing punctuation: mode 5 -> snap 6
        let text = "床前明月光，疑是地上霜。举头望明月，低头思故乡。";
        assert_eq!(detect_smart_line_length(text), Some(6));
    }

    #[test]
    fn smart_length_rejects_irregular_text() {
        assert_eq!(detect_smart_line_length("大江东去，浪淘尽，千古风流人物呀呀呀呀"), None);
        assert_eq!(detect_smart_line_length(""), None);
    }

    #[test]
    fn smart_snap_applied_when_it_fits() {
        // container fits >= 6 rows, poem snaps to 5+1
        let text = "床前明月光，疑是地上霜。举头望明月，低头思故乡。";
        let config = LayoutConfig {
            smart_snap: true,
            ..config(Direction::Vertical)
        };
        let grid = compute(text, 2000.0, 2000.0, 64.0, &config).unwrap();
        assert_eq!(grid.rows, 6);
        // 24 non-whitespace chars (hanzi + punctuation) over 6 rows
        assert_eq!(grid.cols, 4);
    }

    #[test]
    fn smart_snap_falls_back_when_too_tall() {
        let text = "床前明月光，疑是地上霜。举头望明月，低头思故乡。";
        let config = LayoutConfig {
            smart_snap: true,
            ..config(Direction::Vertical)
        };
        // room for only 4 rows: proposal of 6 is rejected
        let grid = compute(text, 2000.0, 4.0 * (CELL_SIZE + GRID_GAP) + 64.0, 64.0, &config).unwrap();
        assert_eq!(grid.rows, 4);
    }

    #[test]
    fn fixed_grid_is_authoritative() {
        let config = LayoutConfig {
            fixed_grid: Some(FixedGrid { rows: 5, cols: 6 }),
            ..config(Direction::Vertical)
        };
        let grid = compute("床前明月光疑是地上霜", 500.0, 500.0, 0.0, &config).unwrap();
        assert_eq!(grid.rows, 5);
        assert_eq!(grid.cols, 2);
    }

    #[test]
    fn fixed_grid_horizontal_derives_rows() {
        let config = LayoutConfig {
            fixed_grid: Some(FixedGrid { rows: 10, cols: 4 }),
            ..config(Direction::Horizontal)
        };
        let grid = compute("床前明月光疑是地上霜", 500.0, 500.0, 0.0, &config).unwrap();
        assert_eq!(grid.cols, 4);
        assert_eq!(grid.rows, 3);
    }

    #[test]
    fn never_returns_zero_dimensions() {
        let grid = compute("", 2000.0, 2000.0, 0.0, &config(Direction::Horizontal)).unwrap();
        assert!(grid.rows >= 1 && grid.cols >= 1);
    }

    #[test]
    fn too_small_container_is_an_error() {
        let err = compute("字", 10.0, 10.0, 0.0, &config(Direction::Horizontal));
        assert!(matches!(err, Err(CopybookError::InvalidConfiguration { .. })));
    }
}
