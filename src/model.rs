#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Preset heading styles. The numeric levels accepted by
/// [`DocumentBuilder::add_heading`](crate::DocumentBuilder::add_heading)
/// map 1 → Title, 2 → Section, 3 → Subsection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeadingLevel {
    Title,
    Section,
    Subsection,
}

impl HeadingLevel {
    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(HeadingLevel::Title),
            2 => Some(HeadingLevel::Section),
            3 => Some(HeadingLevel::Subsection),
            _ => None,
        }
    }

    pub fn font_size(self) -> f32 {
        match self {
            HeadingLevel::Title => 18.0,
            HeadingLevel::Section => 12.0,
            HeadingLevel::Subsection => 11.0,
        }
    }

    pub fn alignment(self) -> Alignment {
        match self {
            HeadingLevel::Title => Alignment::Center,
            _ => Alignment::Left,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Run {
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<[u8; 3]>, // None = automatic (black)
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Heading {
        level: HeadingLevel,
        runs: Vec<Run>,
    },
    Paragraph {
        runs: Vec<Run>,
        alignment: Alignment,
        indent_left: f32, // points
    },
    Bullet {
        runs: Vec<Run>,
        indent_left: f32, // points
    },
    Spacer,
    PageBreak,
}

impl Block {
    pub fn runs(&self) -> &[Run] {
        match self {
            Block::Heading { runs, .. }
            | Block::Paragraph { runs, .. }
            | Block::Bullet { runs, .. } => runs,
            Block::Spacer | Block::PageBreak => &[],
        }
    }

    /// Concatenated literal text of the block's runs.
    pub fn text(&self) -> String {
        self.runs().iter().map(|r| r.text.as_str()).collect()
    }
}

/// Style overrides for [`DocumentBuilder::add_paragraph`](crate::DocumentBuilder::add_paragraph).
/// Unset fields fall back to the document-wide defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParagraphStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub size: Option<f32>,
    pub color: Option<[u8; 3]>,
    pub alignment: Option<Alignment>,
}

/// Document-wide style defaults applied where a block carries no override.
#[derive(Clone, Copy, Debug)]
pub struct Defaults {
    pub body_size: f32,
    pub heading_color: Option<[u8; 3]>,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            body_size: 10.0,
            heading_color: Some([0, 51, 102]),
        }
    }
}

pub struct Document {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub defaults: Defaults,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        // US Letter, 0.5 in top/bottom and 0.7 in side margins in points.
        Document {
            page_width: 612.0,
            page_height: 792.0,
            margin_top: 36.0,
            margin_bottom: 36.0,
            margin_left: 50.4,
            margin_right: 50.4,
            defaults: Defaults::default(),
            blocks: Vec::new(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
