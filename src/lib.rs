mod builder;
mod docx;
mod error;
mod model;
mod pdf;
mod reader;

pub use builder::{DEFAULT_BULLET_INDENT, DocumentBuilder, DocumentWriter, DocxWriter, PdfWriter};
pub use error::Error;
pub use model::{Alignment, Block, Defaults, Document, HeadingLevel, ParagraphStyle, Run};

use std::path::Path;

/// Reads back the plain paragraph texts of a DOCX file in document order.
pub fn extract_text(path: &Path) -> Result<Vec<String>, Error> {
    reader::extract_text(path)
}
