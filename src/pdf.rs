use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::model::{Alignment, Block, Document, Run};

// Base-14 Helvetica family; (bold, italic) selects the variant.
const FONT_NAMES: [&[u8]; 4] = [b"F1", b"F2", b"F3", b"F4"];
const BASE_FONTS: [&[u8]; 4] = [
    b"Helvetica",
    b"Helvetica-Bold",
    b"Helvetica-Oblique",
    b"Helvetica-BoldOblique",
];

const LINE_FACTOR: f32 = 1.2;
const BULLET_HANG: f32 = 12.0; // gap between bullet glyph and text, points

fn font_index(run: &Run) -> usize {
    match (run.bold, run.italic) {
        (false, false) => 0,
        (true, false) => 1,
        (false, true) => 2,
        (true, true) => 3,
    }
}

fn winansi_byte(c: char) -> Option<u8> {
    match c as u32 {
        0x0000..=0x007F => Some(c as u8),
        0x00A0..=0x00FF => Some(c as u8), // Latin-1 supplement maps directly
        0x20AC => Some(0x80),
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85),
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95), // bullet
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
fn to_winansi_bytes(s: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(s.len());
    let mut dropped = 0usize;
    for c in s.chars() {
        match winansi_byte(c) {
            Some(b) => bytes.push(b),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        log::warn!("dropped {dropped} character(s) not representable in WinAnsi");
    }
    bytes
}

/// Approximate Helvetica advance widths at 1000 units/em for WinAnsi
/// bytes 32..=255.
fn glyph_width_1000(byte: u8) -> f32 {
    match byte {
        32 => 278.0,                          // space
        33..=47 => 333.0,                     // punctuation
        48..=57 => 556.0,                     // digits
        58..=64 => 333.0,                     // more punctuation
        73 | 74 => 278.0,                     // I J (narrow uppercase)
        77 => 833.0,                          // M (wide)
        65..=90 => 667.0,                     // uppercase A-Z (average)
        91..=96 => 333.0,                     // brackets etc.
        102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
        109 | 119 => 833.0,                   // m w (wide)
        97..=122 => 556.0,                    // lowercase a-z (average)
        _ => 556.0,
    }
}

fn text_width(bytes: &[u8], font_size: f32) -> f32 {
    bytes
        .iter()
        .map(|&b| glyph_width_1000(b) * font_size / 1000.0)
        .sum()
}

// A word with the style of the run it came from.
struct Word {
    bytes: Vec<u8>,
    width: f32,
    font: usize,
    size: f32,
    color: [u8; 3],
}

fn block_words(runs: &[Run]) -> Vec<Word> {
    let mut words = Vec::new();
    for run in runs {
        for word in run.text.split_whitespace() {
            let bytes = to_winansi_bytes(word);
            words.push(Word {
                width: text_width(&bytes, run.font_size),
                bytes,
                font: font_index(run),
                size: run.font_size,
                color: run.color.unwrap_or([0, 0, 0]),
            });
        }
    }
    words
}

/// Greedy fill: pack words into lines no wider than `avail`.
fn wrap_lines(words: Vec<Word>, avail: f32) -> Vec<Vec<Word>> {
    let mut lines: Vec<Vec<Word>> = Vec::new();
    let mut line: Vec<Word> = Vec::new();
    let mut line_width = 0.0;
    for word in words {
        let space = if line.is_empty() {
            0.0
        } else {
            text_width(b" ", word.size)
        };
        if !line.is_empty() && line_width + space + word.width > avail {
            lines.push(std::mem::take(&mut line));
            line_width = 0.0;
        }
        line_width += if line.is_empty() { 0.0 } else { space } + word.width;
        line.push(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn line_width(line: &[Word]) -> f32 {
    let mut width = 0.0;
    for (i, word) in line.iter().enumerate() {
        if i > 0 {
            width += text_width(b" ", word.size);
        }
        width += word.width;
    }
    width
}

struct Layout<'a> {
    doc: &'a Document,
    finished: Vec<Content>,
    current: Content,
    cursor_y: f32,
}

impl<'a> Layout<'a> {
    fn new(doc: &'a Document) -> Self {
        Layout {
            doc,
            finished: Vec::new(),
            current: Content::new(),
            cursor_y: doc.page_height - doc.margin_top,
        }
    }

    fn new_page(&mut self) {
        let full = std::mem::replace(&mut self.current, Content::new());
        self.finished.push(full);
        self.cursor_y = self.doc.page_height - self.doc.margin_top;
    }

    fn into_pages(mut self) -> Vec<Content> {
        self.finished.push(self.current);
        self.finished
    }

    fn advance(&mut self, line_height: f32) {
        if self.cursor_y - line_height < self.doc.margin_bottom {
            self.new_page();
        }
        self.cursor_y -= line_height;
    }

    fn content(&mut self) -> &mut Content {
        &mut self.current
    }

    fn emit_line(&mut self, line: &[Word], x_start: f32) {
        let y = self.cursor_y;
        let content = self.content();
        content.begin_text();
        content.next_line(x_start, y);
        // Words sharing a style are batched into one show operation.
        let mut current: Option<(usize, u32, [u8; 3])> = None;
        let mut pending: Vec<u8> = Vec::new();
        for (i, word) in line.iter().enumerate() {
            let key = (word.font, word.size.to_bits(), word.color);
            if current != Some(key) {
                if !pending.is_empty() {
                    content.show(Str(&pending));
                    pending.clear();
                }
                content.set_font(Name(FONT_NAMES[word.font]), word.size);
                content.set_fill_rgb(
                    word.color[0] as f32 / 255.0,
                    word.color[1] as f32 / 255.0,
                    word.color[2] as f32 / 255.0,
                );
                current = Some(key);
            }
            if i > 0 {
                pending.push(b' ');
            }
            pending.extend_from_slice(&word.bytes);
        }
        if !pending.is_empty() {
            content.show(Str(&pending));
        }
        content.end_text();
    }

    fn emit_text_block(
        &mut self,
        runs: &[Run],
        alignment: Alignment,
        indent_left: f32,
        bullet: bool,
    ) -> Result<(), Error> {
        if runs.is_empty() {
            return Err(Error::UnsupportedBlock("text block with no runs".into()));
        }
        let line_height = runs
            .iter()
            .map(|r| r.font_size)
            .fold(0.0_f32, f32::max)
            * LINE_FACTOR;

        let text_left = self.doc.margin_left
            + indent_left
            + if bullet { BULLET_HANG } else { 0.0 };
        let avail = self.doc.page_width - self.doc.margin_right - text_left;

        let words = block_words(runs);
        if words.is_empty() {
            self.advance(line_height);
            return Ok(());
        }

        let lines = wrap_lines(words, avail);
        for (i, line) in lines.iter().enumerate() {
            self.advance(line_height);
            let width = line_width(line);
            let x_start = match alignment {
                Alignment::Left => text_left,
                Alignment::Center => text_left + (avail - width) / 2.0,
                Alignment::Right => text_left + avail - width,
            };
            if bullet && i == 0 {
                let size = line[0].size;
                let y = self.cursor_y;
                let x = self.doc.margin_left + indent_left;
                let content = self.content();
                content.begin_text();
                content.set_font(Name(FONT_NAMES[0]), size);
                content.set_fill_rgb(0.0, 0.0, 0.0);
                content.next_line(x, y);
                content.show(Str(&[0x95])); // WinAnsi bullet
                content.end_text();
            }
            self.emit_line(line, x_start);
        }
        Ok(())
    }
}

/// Renders the document as a simplified single-column PDF using the
/// base-14 Helvetica fonts.
pub fn render(doc: &Document) -> Result<Vec<u8>, Error> {
    let mut layout = Layout::new(doc);
    let body_line = doc.defaults.body_size * LINE_FACTOR;

    for block in &doc.blocks {
        match block {
            Block::Heading { level, runs } => {
                layout.advance(4.0); // breathing room above section titles
                layout.emit_text_block(runs, level.alignment(), 0.0, false)?;
            }
            Block::Paragraph {
                runs,
                alignment,
                indent_left,
            } => {
                layout.emit_text_block(runs, *alignment, *indent_left, false)?;
            }
            Block::Bullet { runs, indent_left } => {
                layout.emit_text_block(runs, Alignment::Left, *indent_left, true)?;
            }
            Block::Spacer => {
                layout.advance(body_line);
            }
            Block::PageBreak => {
                layout.new_page();
            }
        }
    }

    let pages = layout.into_pages();

    let mut pdf = Pdf::new();

    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let font_ids: Vec<Ref> = (0..4).map(|i| Ref::new(3 + i)).collect();

    let page_count = pages.len();
    let page_ids: Vec<Ref> = (0..page_count)
        .map(|i| Ref::new(7 + 2 * i as i32))
        .collect();
    let content_ids: Vec<Ref> = (0..page_count)
        .map(|i| Ref::new(8 + 2 * i as i32))
        .collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_count as i32);

    for (i, content) in pages.into_iter().enumerate() {
        pdf.stream(content_ids[i], &content.finish());

        let mut page_obj = pdf.page(page_ids[i]);
        page_obj
            .media_box(Rect::new(0.0, 0.0, doc.page_width, doc.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page_obj.resources();
        let mut fonts = resources.fonts();
        for (name, font_id) in FONT_NAMES.iter().zip(&font_ids) {
            fonts.pair(Name(*name), *font_id);
        }
    }

    for (base, font_id) in BASE_FONTS.iter().zip(&font_ids) {
        pdf.type1_font(*font_id)
            .base_font(Name(*base))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    Ok(pdf.finish())
}

#[cfg(test)]
mod tests {
    use super::to_winansi_bytes;

    #[test]
    fn winansi_keeps_remapped_punctuation() {
        assert_eq!(to_winansi_bytes("details\u{2026}"), b"details\x85");
        assert_eq!(
            to_winansi_bytes("\u{201C}quoted\u{201D} \u{2013} dash"),
            b"\x93quoted\x94 \x96 dash"
        );
        assert_eq!(
            to_winansi_bytes("\u{0152}uvre \u{2020} \u{2030} \u{0160}"),
            b"\x8Cuvre \x86 \x89 \x8A"
        );
    }

    #[test]
    fn winansi_drops_unmappable_chars() {
        assert_eq!(to_winansi_bytes("a\u{2192}b"), b"ab");
    }
}
