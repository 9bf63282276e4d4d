use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::model::{
    Alignment, Block, Defaults, Document, HeadingLevel, ParagraphStyle, Run,
};
use crate::{docx, pdf};

/// Default bullet indent in points (0.25 in).
pub const DEFAULT_BULLET_INDENT: f32 = 18.0;

/// Binds the abstract block model to a concrete file format.
pub trait DocumentWriter {
    fn write(&self, doc: &Document) -> Result<Vec<u8>, Error>;
}

pub struct DocxWriter;

impl DocumentWriter for DocxWriter {
    fn write(&self, doc: &Document) -> Result<Vec<u8>, Error> {
        docx::write(doc)
    }
}

pub struct PdfWriter;

impl DocumentWriter for PdfWriter {
    fn write(&self, doc: &Document) -> Result<Vec<u8>, Error> {
        pdf::render(doc)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum State {
    Open,
    Rendered,
}

/// Append-only assembler for a styled document.
///
/// Blocks are appended in order and rendered exactly once; after a
/// successful [`render`](DocumentBuilder::render) the builder is terminal
/// and every further call fails with [`Error::InvalidState`].
pub struct DocumentBuilder {
    doc: Document,
    state: State,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        DocumentBuilder {
            doc: Document::new(),
            state: State::Open,
        }
    }

    fn ensure_open(&self) -> Result<(), Error> {
        match self.state {
            State::Open => Ok(()),
            State::Rendered => Err(Error::InvalidState("builder already rendered")),
        }
    }

    fn check_length(value: f32, what: &str) -> Result<(), Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "{what} must be a non-negative length, got {value}"
            )));
        }
        Ok(())
    }

    fn check_font_size(size: f32) -> Result<(), Error> {
        if !size.is_finite() || size <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "font size must be positive, got {size}"
            )));
        }
        Ok(())
    }

    /// Sets the page margins in points. Affects rendering only.
    pub fn set_margins(
        &mut self,
        top: f32,
        bottom: f32,
        left: f32,
        right: f32,
    ) -> Result<(), Error> {
        self.ensure_open()?;
        Self::check_length(top, "top margin")?;
        Self::check_length(bottom, "bottom margin")?;
        Self::check_length(left, "left margin")?;
        Self::check_length(right, "right margin")?;
        self.doc.margin_top = top;
        self.doc.margin_bottom = bottom;
        self.doc.margin_left = left;
        self.doc.margin_right = right;
        Ok(())
    }

    /// Replaces the document-wide style defaults.
    pub fn set_defaults(&mut self, defaults: Defaults) -> Result<(), Error> {
        self.ensure_open()?;
        Self::check_font_size(defaults.body_size)?;
        self.doc.defaults = defaults;
        Ok(())
    }

    /// Appends a heading. `level` must be 1 (title), 2 (section) or
    /// 3 (subsection).
    pub fn add_heading(&mut self, text: &str, level: u8) -> Result<(), Error> {
        self.ensure_open()?;
        let level = HeadingLevel::from_number(level).ok_or_else(|| {
            Error::InvalidArgument(format!("heading level must be 1..=3, got {level}"))
        })?;
        let run = Run {
            text: text.to_string(),
            font_size: level.font_size(),
            bold: true,
            italic: false,
            color: self.doc.defaults.heading_color,
        };
        self.doc.blocks.push(Block::Heading {
            level,
            runs: vec![run],
        });
        Ok(())
    }

    /// Appends a single-run paragraph. Unset fields of `style` fall back
    /// to the document defaults.
    pub fn add_paragraph(&mut self, text: &str, style: ParagraphStyle) -> Result<(), Error> {
        self.ensure_open()?;
        let run = self.resolve_run(text, style)?;
        self.doc.blocks.push(Block::Paragraph {
            runs: vec![run],
            alignment: style.alignment.unwrap_or(Alignment::Left),
            indent_left: 0.0,
        });
        Ok(())
    }

    /// Appends a bullet item with the given left indent in points.
    pub fn add_bullet(&mut self, text: &str, indent: f32) -> Result<(), Error> {
        self.ensure_open()?;
        Self::check_length(indent, "bullet indent")?;
        let run = self.resolve_run(text, ParagraphStyle::default())?;
        self.doc.blocks.push(Block::Bullet {
            runs: vec![run],
            indent_left: indent,
        });
        Ok(())
    }

    /// Appends a paragraph composed of several pre-styled runs, e.g. a bold
    /// label followed by plain detail text on one line.
    pub fn add_multi_run_line(&mut self, runs: Vec<Run>) -> Result<(), Error> {
        self.ensure_open()?;
        Self::check_runs(&runs)?;
        self.doc.blocks.push(Block::Paragraph {
            runs,
            alignment: Alignment::Left,
            indent_left: 0.0,
        });
        Ok(())
    }

    /// Bullet-item variant of [`add_multi_run_line`](Self::add_multi_run_line).
    pub fn add_multi_run_bullet(&mut self, runs: Vec<Run>, indent: f32) -> Result<(), Error> {
        self.ensure_open()?;
        Self::check_length(indent, "bullet indent")?;
        Self::check_runs(&runs)?;
        self.doc.blocks.push(Block::Bullet {
            runs,
            indent_left: indent,
        });
        Ok(())
    }

    /// Appends a vertical gap.
    pub fn add_spacer(&mut self) -> Result<(), Error> {
        self.ensure_open()?;
        self.doc.blocks.push(Block::Spacer);
        Ok(())
    }

    /// Forces subsequent content onto a new page.
    pub fn add_page_break(&mut self) -> Result<(), Error> {
        self.ensure_open()?;
        self.doc.blocks.push(Block::PageBreak);
        Ok(())
    }

    fn check_runs(runs: &[Run]) -> Result<(), Error> {
        if runs.is_empty() {
            return Err(Error::InvalidArgument("runs must not be empty".into()));
        }
        for run in runs {
            Self::check_font_size(run.font_size)?;
        }
        Ok(())
    }

    fn resolve_run(&self, text: &str, style: ParagraphStyle) -> Result<Run, Error> {
        let size = style.size.unwrap_or(self.doc.defaults.body_size);
        Self::check_font_size(size)?;
        Ok(Run {
            text: text.to_string(),
            font_size: size,
            bold: style.bold.unwrap_or(false),
            italic: style.italic.unwrap_or(false),
            color: style.color,
        })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.doc.blocks
    }

    /// Renders the document to `path`, choosing the writer from the file
    /// extension (`docx` or `pdf`).
    pub fn render(&mut self, path: &Path) -> Result<(), Error> {
        self.ensure_open()?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("docx") => self.render_with(&DocxWriter, path),
            Some("pdf") => self.render_with(&PdfWriter, path),
            _ => Err(Error::InvalidArgument(format!(
                "unsupported output extension: {}",
                path.display()
            ))),
        }
    }

    /// Renders the document through an explicit writer. The output is
    /// written to a temporary file next to `path` and renamed into place,
    /// so a failed render leaves no partial file behind.
    pub fn render_with(&mut self, writer: &dyn DocumentWriter, path: &Path) -> Result<(), Error> {
        self.ensure_open()?;
        log::debug!(
            "rendering {} blocks to {}",
            self.doc.blocks.len(),
            path.display()
        );
        let bytes = writer.write(&self.doc)?;
        write_atomic(path, &bytes)?;
        self.state = State::Rendered;
        Ok(())
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::InvalidArgument(format!("not a file path: {}", path.display())))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let tmp = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));
    if let Err(e) = fs::write(&tmp, bytes) {
        // A partial write must not leave the temp file behind.
        let _ = fs::remove_file(&tmp);
        return Err(Error::Io(e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::Io(e));
    }
    Ok(())
}
