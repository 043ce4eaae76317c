//! Structured document content model.
//!
//! Mirrors the JSON emitted by hosted document editors: a body of structural
//! elements, each a paragraph (with a named style such as `HEADING_2`), a
//! table, or a section break. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::constants::fallback::TABLE_PLACEHOLDER;
use crate::constants::heading::MAX_LEVEL;
use crate::types::Result;

const HEADING_STYLE_PREFIX: &str = "HEADING_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableMode {
    /// Replace each table with a fixed marker line
    #[default]
    Placeholder,
    /// Best-effort pipe table, header separator after the first row
    Pipe,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDocument {
    pub title: String,
    pub body: Body,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Body {
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuralElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_break: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paragraph {
    pub elements: Vec<ParagraphElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_style: Option<ParagraphStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextRun {
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphStyle {
    pub named_style_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Table {
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableRow {
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableCell {
    pub content: Vec<StructuralElement>,
}

impl Paragraph {
    /// Concatenated text runs
    pub fn text(&self) -> String {
        self.elements
            .iter()
            .filter_map(|e| e.text_run.as_ref())
            .map(|run| run.content.as_str())
            .collect()
    }

    /// Heading level from a `HEADING_n` named style
    pub fn heading_level(&self) -> Option<usize> {
        let style = &self.paragraph_style.as_ref()?.named_style_type;
        let level: usize = style.strip_prefix(HEADING_STYLE_PREFIX)?.parse().ok()?;
        (1..=MAX_LEVEL as usize).contains(&level).then_some(level)
    }
}

impl TableCell {
    fn text(&self) -> String {
        let raw: String = self
            .content
            .iter()
            .filter_map(|e| e.paragraph.as_ref())
            .map(Paragraph::text)
            .collect();
        raw.split_whitespace().collect::<Vec<_>>().join(" ").replace('|', "\\|")
    }
}

impl Table {
    fn to_pipe_rows(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (index, row) in self.table_rows.iter().enumerate() {
            let cells: Vec<String> = row.table_cells.iter().map(TableCell::text).collect();
            lines.push(format!("| {} |", cells.join(" | ")));
            if index == 0 {
                let separator = vec!["---"; cells.len().max(1)].join(" | ");
                lines.push(format!("| {} |", separator));
            }
        }
        lines
    }
}

impl ContentDocument {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Normalize to heading-marked text: `HEADING_n` paragraphs become ATX
    /// headings, section breaks become blank lines.
    pub fn to_heading_text(&self, tables: TableMode) -> String {
        let mut lines: Vec<String> = Vec::new();

        for element in &self.body.content {
            if let Some(paragraph) = &element.paragraph {
                let text = paragraph.text();
                let text = text.trim_end_matches(['\n', '\r']);
                match paragraph.heading_level() {
                    Some(level) => lines.push(format!("{} {}", "#".repeat(level), text.trim())),
                    None => lines.push(text.to_string()),
                }
            } else if let Some(table) = &element.table {
                lines.push(String::new());
                match tables {
                    TableMode::Placeholder => lines.push(TABLE_PLACEHOLDER.to_string()),
                    TableMode::Pipe => lines.extend(table.to_pipe_rows()),
                }
                lines.push(String::new());
            } else if element.section_break.is_some() {
                lines.push(String::new());
            }
        }

        lines.join("\n")
    }

    /// All text runs, tables included; used as the size signal for fallback
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.body.content, &mut out);
        out
    }
}

fn collect_text(elements: &[StructuralElement], out: &mut String) {
    for element in elements {
        if let Some(paragraph) = &element.paragraph {
            out.push_str(&paragraph.text());
        }
        if let Some(table) = &element.table {
            for cell in table.table_rows.iter().flat_map(|r| &r.table_cells) {
                collect_text(&cell.content, out);
            }
        }
    }
}
