mod colour;
pub use colour::*;

pub mod config;
pub use config::{
    BorderMode, ColumnOrder, Direction, FixedGrid, GridDecoration, LayoutConfig, ParagraphFlow,
    UNBOUNDED,
};

mod content;
pub use content::*;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod export;
pub use export::*;

mod font;
pub use font::*;

/// Grid sizing and smart line-length detection
pub mod grid;

mod info;
pub use info::*;

/// Layout strategies and viewport queries over the laid-out stream
pub mod layout;

mod page;
pub use page::*;

mod paginate;
pub use paginate::*;

mod pagesize;
pub use pagesize::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

/// TrueType subsetting for embedded fonts
pub mod subset;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
