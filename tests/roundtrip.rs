use std::io::Read;
use std::path::Path;

use blockdoc::{
    Alignment, DEFAULT_BULLET_INDENT, DocumentBuilder, ParagraphStyle, Run, extract_text,
};

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn read_document_xml(path: &Path) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    let mut xml = String::new();
    zip.by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

fn sample_builder() -> DocumentBuilder {
    let mut builder = DocumentBuilder::new();
    builder.add_heading("SUMMARY", 1).unwrap();
    builder
        .add_paragraph(
            "10+ years experience.",
            ParagraphStyle {
                bold: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    builder.add_bullet("Reduced X by 50%", DEFAULT_BULLET_INDENT).unwrap();
    builder
}

#[test]
fn docx_round_trip_preserves_text_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.docx");

    sample_builder().render(&out).unwrap();

    let texts = extract_text(&out).unwrap();
    assert_eq!(
        texts,
        vec!["SUMMARY", "10+ years experience.", "Reduced X by 50%"]
    );
}

#[test]
fn spacers_and_page_breaks_do_not_produce_text() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.docx");

    let mut builder = DocumentBuilder::new();
    builder.add_paragraph("first", ParagraphStyle::default()).unwrap();
    builder.add_spacer().unwrap();
    builder.add_page_break().unwrap();
    builder.add_paragraph("second", ParagraphStyle::default()).unwrap();
    builder.render(&out).unwrap();

    assert_eq!(extract_text(&out).unwrap(), vec!["first", "second"]);
}

#[test]
fn multi_run_line_round_trips_as_one_paragraph() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.docx");

    let mut builder = DocumentBuilder::new();
    builder
        .add_multi_run_line(vec![
            Run {
                text: "Cloud & Automation: ".to_string(),
                font_size: 10.0,
                bold: true,
                italic: false,
                color: None,
            },
            Run {
                text: "AWS Config, Lambda, EventBridge".to_string(),
                font_size: 10.0,
                bold: false,
                italic: false,
                color: None,
            },
        ])
        .unwrap();
    builder.render(&out).unwrap();

    assert_eq!(
        extract_text(&out).unwrap(),
        vec!["Cloud & Automation: AWS Config, Lambda, EventBridge"]
    );
}

#[test]
fn docx_encodes_styles_margins_and_bullets() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.docx");

    let mut builder = sample_builder();
    builder.set_margins(36.0, 36.0, 50.4, 50.4).unwrap();
    builder
        .add_paragraph(
            "Active Secret Clearance",
            ParagraphStyle {
                italic: Some(true),
                alignment: Some(Alignment::Center),
                ..Default::default()
            },
        )
        .unwrap();
    builder.render(&out).unwrap();

    let xml = read_document_xml(&out);
    let doc = roxmltree::Document::parse(&xml).unwrap();

    let wml = |n: roxmltree::Node| {
        (
            n.tag_name().name().to_string(),
            n.tag_name().namespace() == Some(WML_NS),
        )
    };

    // Title heading is centered, bold, 18 pt (36 half-points), accent color.
    assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
    assert!(xml.contains(r#"<w:sz w:val="36"/>"#));
    assert!(xml.contains(r#"<w:color w:val="003366"/>"#));
    assert!(xml.contains("<w:b/>"));
    assert!(xml.contains("<w:i/>"));

    // Bullet references the single numbering definition with an indent
    // override (18 pt = 360 twips).
    assert!(xml.contains(r#"<w:numId w:val="1"/>"#));
    assert!(xml.contains(r#"<w:ind w:left="360"/>"#));

    // Margins land in sectPr as twips.
    let sect = doc
        .descendants()
        .find(|n| wml(*n) == ("sectPr".to_string(), true))
        .unwrap();
    let pg_mar = sect
        .children()
        .find(|n| wml(*n) == ("pgMar".to_string(), true))
        .unwrap();
    assert_eq!(pg_mar.attribute((WML_NS, "top")), Some("720"));
    assert_eq!(pg_mar.attribute((WML_NS, "left")), Some("1008"));
}

#[test]
fn pdf_output_contains_text() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.pdf");

    sample_builder().render(&out).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(contains(&bytes, b"SUMMARY"));
    assert!(contains(&bytes, b"Reduced X by 50%"));
}

#[test]
fn pdf_page_break_produces_second_page() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.pdf");

    let mut builder = DocumentBuilder::new();
    builder.add_paragraph("page one", ParagraphStyle::default()).unwrap();
    builder.add_page_break().unwrap();
    builder.add_paragraph("page two", ParagraphStyle::default()).unwrap();
    builder.render(&out).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert!(contains(&bytes, b"/Count 2"));
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
