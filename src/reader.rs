use std::io::Read;
use std::path::Path;

use crate::error::Error;

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
}

fn paragraph_text(node: roxmltree::Node) -> String {
    node.children()
        .filter(|n| n.tag_name().name() == "r" && n.tag_name().namespace() == Some(WML_NS))
        .flat_map(|r| {
            r.children()
                .filter(|n| n.tag_name().name() == "t" && n.tag_name().namespace() == Some(WML_NS))
        })
        .filter_map(|t| t.text())
        .collect()
}

/// Extracts the plain paragraph texts of a DOCX file in document order,
/// skipping empty paragraphs (spacers and page breaks). Style metadata is
/// discarded.
pub fn extract_text(path: &Path) -> Result<Vec<String>, Error> {
    let file = std::fs::File::open(path)?;
    let mut zip = zip::ZipArchive::new(file)?;

    let mut xml_content = String::new();
    zip.by_name("word/document.xml")
        .map_err(|_| Error::InvalidDocx("missing word/document.xml".into()))?
        .read_to_string(&mut xml_content)?;

    let xml = roxmltree::Document::parse(&xml_content)?;
    let root = xml.root_element();
    let body = wml(root, "body").ok_or_else(|| Error::InvalidDocx("missing w:body".into()))?;

    let mut texts = Vec::new();
    for node in body.children() {
        if node.tag_name().name() != "p" || node.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        let text = paragraph_text(node);
        if !text.trim().is_empty() {
            texts.push(text);
        }
    }
    log::debug!("extracted {} paragraphs from {}", texts.len(), path.display());
    Ok(texts)
}
