use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::Error;
use crate::model::{Alignment, Block, Document, Run};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/></Relationships>"#;

// Single bullet list definition; bullet paragraphs reference numId 1 and
// override the indent with a paragraph-level w:ind.
const NUMBERING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/><w:lvlText w:val="&#8226;"/><w:pPr><w:ind w:left="360" w:hanging="180"/></w:pPr></w:lvl></w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#;

fn pts_to_twips(pts: f32) -> i64 {
    (pts * 20.0).round() as i64
}

fn pts_to_half_points(pts: f32) -> i64 {
    (pts * 2.0).round() as i64
}

fn hex_color(color: [u8; 3]) -> String {
    format!("{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn styles_xml(doc: &Document) -> String {
    let body_sz = pts_to_half_points(doc.defaults.body_size);
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            r#"<w:docDefaults>"#,
            r#"<w:rPrDefault><w:rPr><w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/></w:rPr></w:rPrDefault>"#,
            r#"<w:pPrDefault><w:pPr><w:spacing w:after="0"/></w:pPr></w:pPrDefault>"#,
            r#"</w:docDefaults>"#,
            r#"</w:styles>"#
        ),
        sz = body_sz
    )
}

fn run_xml(run: &Run) -> String {
    let mut rpr = String::new();
    if run.bold {
        rpr.push_str("<w:b/>");
    }
    if run.italic {
        rpr.push_str("<w:i/>");
    }
    if let Some(color) = run.color {
        rpr.push_str(&format!(r#"<w:color w:val="{}"/>"#, hex_color(color)));
    }
    let sz = pts_to_half_points(run.font_size);
    rpr.push_str(&format!(
        r#"<w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/>"#
    ));
    format!(
        r#"<w:r><w:rPr>{rpr}</w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
        xml_escape(&run.text)
    )
}

fn jc_xml(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "",
        Alignment::Center => r#"<w:jc w:val="center"/>"#,
        Alignment::Right => r#"<w:jc w:val="right"/>"#,
    }
}

fn block_xml(block: &Block) -> Result<String, Error> {
    match block {
        Block::Heading { level, runs } => {
            let runs = non_empty(runs, "heading")?;
            let body: String = runs.iter().map(run_xml).collect();
            Ok(format!(
                "<w:p><w:pPr>{}</w:pPr>{body}</w:p>",
                jc_xml(level.alignment())
            ))
        }
        Block::Paragraph {
            runs,
            alignment,
            indent_left,
        } => {
            let runs = non_empty(runs, "paragraph")?;
            let mut ppr = String::from(jc_xml(*alignment));
            if *indent_left > 0.0 {
                ppr.push_str(&format!(
                    r#"<w:ind w:left="{}"/>"#,
                    pts_to_twips(*indent_left)
                ));
            }
            let body: String = runs.iter().map(run_xml).collect();
            Ok(format!("<w:p><w:pPr>{ppr}</w:pPr>{body}</w:p>"))
        }
        Block::Bullet { runs, indent_left } => {
            let runs = non_empty(runs, "bullet")?;
            let ppr = format!(
                concat!(
                    r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr>"#,
                    r#"<w:ind w:left="{}"/>"#
                ),
                pts_to_twips(*indent_left)
            );
            let body: String = runs.iter().map(run_xml).collect();
            Ok(format!("<w:p><w:pPr>{ppr}</w:pPr>{body}</w:p>"))
        }
        Block::Spacer => Ok("<w:p/>".to_string()),
        Block::PageBreak => Ok(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#.to_string()),
    }
}

fn non_empty<'a>(runs: &'a [Run], what: &str) -> Result<&'a [Run], Error> {
    if runs.is_empty() {
        return Err(Error::UnsupportedBlock(format!("{what} block with no runs")));
    }
    Ok(runs)
}

fn document_xml(doc: &Document) -> Result<String, Error> {
    let mut body = String::new();
    for block in &doc.blocks {
        body.push_str(&block_xml(block)?);
    }
    Ok(format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            "<w:body>{body}",
            r#"<w:sectPr><w:pgSz w:w="{w}" w:h="{h}"/>"#,
            r#"<w:pgMar w:top="{top}" w:right="{right}" w:bottom="{bottom}" w:left="{left}"/>"#,
            "</w:sectPr></w:body></w:document>"
        ),
        body = body,
        w = pts_to_twips(doc.page_width),
        h = pts_to_twips(doc.page_height),
        top = pts_to_twips(doc.margin_top),
        right = pts_to_twips(doc.margin_right),
        bottom = pts_to_twips(doc.margin_bottom),
        left = pts_to_twips(doc.margin_left),
    ))
}

/// Serializes the document as a minimal OOXML (DOCX) package.
pub fn write(doc: &Document) -> Result<Vec<u8>, Error> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
        ("word/styles.xml", styles_xml(doc)),
        ("word/numbering.xml", NUMBERING.to_string()),
        ("word/document.xml", document_xml(doc)?),
    ];

    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
