use crate::error::Warning;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StyleRecord {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkStyle {
    #[default]
    Markdown,
    WikiLink,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub link_style: LinkStyle,
    pub include_backgrounds: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ImageFormat {
    NativeCompressedBitmap,
    Standard,
}

impl ImageFormat {
    pub(crate) fn from_name(name: &str) -> Self {
        let is_zdib = name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("zdib"));
        if is_zdib {
            ImageFormat::NativeCompressedBitmap
        } else {
            ImageFormat::Standard
        }
    }
}

/// Element kinds the emitter reacts to. Everything else is walked through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ElementKind {
    ImageData,
    Line,
    Inert,
}

impl ElementKind {
    pub(crate) fn classify(node: roxmltree::Node) -> Self {
        match node.tag_name().name() {
            "imagedata" => ElementKind::ImageData,
            "l" if node.tag_name().namespace() != Some(crate::snb::VML_NS) => ElementKind::Line,
            _ => ElementKind::Inert,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StyleWrapper {
    Bold,
    Emphasis,
}

impl StyleWrapper {
    /// Bold wins over italic/underline; combined styles collapse to one marker.
    pub(crate) fn for_style(style: &StyleRecord) -> Option<Self> {
        if style.bold {
            Some(StyleWrapper::Bold)
        } else if style.italic || style.underline {
            Some(StyleWrapper::Emphasis)
        } else {
            None
        }
    }

    pub(crate) fn marker(self) -> &'static str {
        match self {
            StyleWrapper::Bold => "**",
            StyleWrapper::Emphasis => "_",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BulletKind {
    Disc,
    Circle,
    Ordered,
    Square,
}

impl BulletKind {
    pub(crate) fn from_text(text: &str) -> Option<Self> {
        let first = text.chars().next()?;
        Some(match text {
            "l" => BulletKind::Disc,
            "u" => BulletKind::Circle,
            _ if first.is_ascii_digit() => BulletKind::Ordered,
            _ => BulletKind::Square,
        })
    }

    /// Ordered items always render as `1.`, Markdown renumbers them.
    pub(crate) fn prefix(self) -> &'static str {
        match self {
            BulletKind::Disc => "* ",
            BulletKind::Circle => "    - ",
            BulletKind::Ordered => "1. ",
            BulletKind::Square => "        + ",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Names of the image files written, in document order.
    pub images: Vec<String>,
    pub warnings: Vec<Warning>,
}
