//! DOCX text extraction.
//!
//! Primary path: `docx-rs` document traversal (paragraph runs to text).
//! Degraded fallback: when `docx-rs` cannot parse the package, unzip it
//! with `zip`, read `word/document.xml`, and strip the markup by hand.
//! The fallback trades structure for resilience against packages that
//! are valid OOXML zips but trip the structured reader; its use is
//! logged at warn level.

use std::io::{Cursor, Read};

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};

use crate::ExtractError;

/// Extract text from DOCX bytes.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    match extract_structured(bytes) {
        Ok(text) if !text.trim().is_empty() => Ok(text),
        Ok(_) => {
            // Structured read succeeded but found nothing; the raw XML
            // may still carry text in parts the reader skipped.
            extract_fallback(bytes)
        }
        Err(e) => {
            tracing::warn!(error = %e, "docx-rs parse failed, using raw XML fallback");
            extract_fallback(bytes)
        }
    }
}

/// Structured traversal: paragraphs and table cells, one line each.
fn extract_structured(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = read_docx(bytes)
        .map_err(|e| ExtractError::Extraction(format!("Failed to read DOCX: {e:?}")))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => {
                let line = paragraph_text(p);
                if !line.is_empty() {
                    lines.push(line);
                }
            }
            DocumentChild::Table(table) => {
                for TableChild::TableRow(row) in &table.rows {
                    for TableRowChild::TableCell(cell) in &row.cells {
                        for content in &cell.children {
                            if let TableCellContent::Paragraph(p) = content {
                                let line = paragraph_text(p);
                                if !line.is_empty() {
                                    lines.push(line);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text.trim().to_string()
}

/// Raw fallback: unzip, read `word/document.xml`, strip tags, decode
/// the five standard XML entities, collapse whitespace. Paragraph
/// closes become newlines so line structure survives.
fn extract_fallback(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Extraction(format!("Not a valid DOCX package: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Extraction(format!("DOCX package has no document.xml: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Extraction(format!("Failed to read document.xml: {e}")))?;

    Ok(strip_document_xml(&xml))
}

/// Strip OOXML markup from `word/document.xml` content.
fn strip_document_xml(xml: &str) -> String {
    let with_breaks = xml.replace("</w:p>", "\n");

    let mut text = String::with_capacity(with_breaks.len());
    let mut in_tag = false;
    for c in with_breaks.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");

    // Collapse runs of spaces/tabs per line, drop blank lines.
    decoded
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
