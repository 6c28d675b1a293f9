//! The structured content model: paragraphs of typed lines.
//!
//! Content arrives either as the JSON form persisted by upstream tooling or
//! as plain text. Once constructed a [StructuredContent] is an immutable
//! value; paragraph order is the only valid reading order.

use serde::{Deserialize, Serialize};

/// Classifies a paragraph, scaling its font size / line height / advance by a
/// fixed per-type factor during layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphType {
    /// Body text, rendered at full scale
    #[default]
    Main,
    /// Small annotation text
    Small,
    /// Interlinear or trailing notes
    Note,
    /// Preface / foreword text
    Preface,
    /// Indented block
    Indent,
}

/// A paragraph of the source work. `lines` preserves the explicit line breaks
/// of the source; whether a layout strategy honours or flattens them is up to
/// the strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(rename = "type", default)]
    pub kind: ParagraphType,
    pub lines: Vec<String>,
}

impl Paragraph {
    pub fn main<S: ToString>(lines: Vec<S>) -> Paragraph {
        Paragraph {
            kind: ParagraphType::Main,
            lines: lines.into_iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// An ordered sequence of paragraphs. Insertion order is the reading order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuredContent {
    pub paragraphs: Vec<Paragraph>,
}

impl StructuredContent {
    /// Parse the persisted JSON form of a work. Fails with
    /// [CopybookError::ContentParse](crate::CopybookError::ContentParse) on
    /// malformed input.
    pub fn from_json(json: &str) -> Result<StructuredContent, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse the persisted JSON form, recovering from malformed input by
    /// substituting an empty paragraph list so downstream layout still runs.
    pub fn from_json_lossy(json: &str) -> StructuredContent {
        match Self::from_json(json) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("malformed structured content, substituting empty: {err}");
                StructuredContent::default()
            }
        }
    }

    /// Build content from plain text: blank lines separate paragraphs,
    /// newlines separate lines, everything is [ParagraphType::Main].
    pub fn from_plain_text(text: &str) -> StructuredContent {
        let paragraphs = text
            .split("\n\n")
            .filter(|block| !block.trim().is_empty())
            .map(|block| Paragraph {
                kind: ParagraphType::Main,
                lines: block.lines().map(|l| l.to_string()).collect(),
            })
            .collect();
        StructuredContent { paragraphs }
    }

    /// Render back to plain text: lines joined by `\n`, paragraphs by `\n\n`.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Every character of every line, in reading order, with the line and
    /// paragraph structure flattened away.
    pub fn flat_chars(&self) -> impl Iterator<Item = (char, ParagraphType)> + '_ {
        self.paragraphs
            .iter()
            .flat_map(|p| p.lines.iter().flat_map(move |l| l.chars().map(move |c| (c, p.kind))))
    }

    /// Count of non-whitespace characters, used by grid sizing.
    pub fn char_count(&self) -> usize {
        self.flat_chars().filter(|(c, _)| !c.is_whitespace()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(|p| p.lines.iter().all(|l| l.is_empty()))
    }
}
