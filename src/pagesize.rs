//! Pre-defined page sizes for common paper formats.
//!
//! All sizes are provided in portrait orientation (width, height) where
//! width ≤ height. Use [PageOrientation] to convert between portrait and
//! landscape.

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));
pub const B5: PageSize = (Pt(176.0 * 72.0 / 25.4), Pt(250.0 * 72.0 / 25.4));
pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));

/// Utilities to force a page size into a given orientation
pub trait PageOrientation {
    /// Force the page size into a portrait orientation (width ≤ height)
    fn portrait(self) -> Self;
    /// Force the page size into a landscape orientation (width ≥ height)
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 .0 > self.1 .0 {
            (self.1, self.0)
        } else {
            self
        }
    }

    fn landscape(self) -> Self {
        if self.0 .0 < self.1 .0 {
            (self.1, self.0)
        } else {
            self
        }
    }
}
