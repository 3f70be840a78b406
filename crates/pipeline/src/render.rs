//! Output document rendering.
//!
//! Generated artifacts are emitted as DOCX regardless of the source
//! format: one paragraph per line of assembled text. Layout fidelity
//! is logical, not binary-exact; the substitution engine owns the
//! content, this module only packages it.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};

use formgen_core::CoreError;

/// Render assembled text into DOCX bytes.
pub fn render_docx(text: &str) -> Result<Vec<u8>, CoreError> {
    let mut docx = Docx::new();
    for line in text.lines() {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| CoreError::Internal(format!("Failed to pack DOCX output: {e}")))?;
    Ok(buf.into_inner())
}
