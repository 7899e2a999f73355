#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::Path;

use snb2md::ImageSink;
use zip::write::SimpleFileOptions;

pub const SN_NS: &str = "http://schemas.samsung.com/snote/2012";
pub const VML_NS: &str = "urn:schemas-microsoft-com:vml";
pub const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Character styles used by most fixtures: 1 bold, 2 italic, 3 underline,
/// 4 everything, 5 plain.
pub const DEFAULT_STYLES: &str = r#"
    <sn:style sn:type="paragraph" sn:styleId="Normal"><sn:rPr><sn:b/></sn:rPr></sn:style>
    <sn:style sn:type="character" sn:styleId="Character1"><sn:rPr><sn:b/></sn:rPr></sn:style>
    <sn:style sn:type="character" sn:styleId="Character2"><sn:rPr><sn:i/></sn:rPr></sn:style>
    <sn:style sn:type="character" sn:styleId="Character3"><sn:rPr><sn:u/></sn:rPr></sn:style>
    <sn:style sn:type="character" sn:styleId="Character4"><sn:rPr><sn:b/><sn:i/><sn:u/></sn:rPr></sn:style>
    <sn:style sn:type="character" sn:styleId="Character5"><sn:rPr/></sn:style>"#;

/// Builds synthetic `.snb` archives in memory.
pub struct SnbBuilder {
    root: &'static str,
    styles: String,
    relationships: Vec<(String, String)>,
    body: String,
    resources: Vec<(String, Vec<u8>)>,
}

impl SnbBuilder {
    pub fn new() -> Self {
        SnbBuilder {
            root: "snote/",
            styles: DEFAULT_STYLES.to_string(),
            relationships: Vec::new(),
            body: String::new(),
            resources: Vec::new(),
        }
    }

    /// Store every part under `/snote/` like some older exporters do.
    pub fn leading_slash(mut self) -> Self {
        self.root = "/snote/";
        self
    }

    pub fn styles(mut self, styles: &str) -> Self {
        self.styles = styles.to_string();
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn image(mut self, rel_id: &str, target: &str, data: Vec<u8>) -> Self {
        self.relationships
            .push((rel_id.to_string(), target.to_string()));
        self.resources.push((target.to_string(), data));
        self
    }

    pub fn relationship(mut self, rel_id: &str, target: &str) -> Self {
        self.relationships
            .push((rel_id.to_string(), target.to_string()));
        self
    }

    pub fn styles_xml(&self) -> String {
        format!(r#"<?xml version="1.0" encoding="UTF-8"?><sn:styles xmlns:sn="{SN_NS}">{}</sn:styles>"#, self.styles)
    }

    pub fn rels_xml(&self) -> String {
        let rels: String = self
            .relationships
            .iter()
            .map(|(id, target)| {
                format!(r#"<Relationship Id="{id}" Type="http://schemas.samsung.com/image" Target="{target}"/>"#)
            })
            .collect();
        format!(r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="{PKG_REL_NS}">{rels}</Relationships>"#)
    }

    pub fn body_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><sn:snote xmlns:sn="{SN_NS}" xmlns:v="{VML_NS}" xmlns:r="{REL_NS}"><sn:page><sn:body>{}</sn:body></sn:page></sn:snote>"#,
            self.body
        )
    }

    pub fn build(&self) -> Vec<u8> {
        let mut parts: Vec<(String, Vec<u8>)> = vec![
            ("styles.xml".to_string(), self.styles_xml().into_bytes()),
            ("_rels/snote.xml.rels".to_string(), self.rels_xml().into_bytes()),
            ("snote.xml".to_string(), self.body_xml().into_bytes()),
        ];
        parts.extend(self.resources.iter().cloned());
        build_zip(
            parts
                .iter()
                .map(|(name, data)| (format!("{}{}", self.root, name), data.as_slice())),
        )
    }

    pub fn write_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, self.build()).unwrap();
    }
}

pub fn build_zip<'a>(entries: impl IntoIterator<Item = (String, &'a [u8])>) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A line with the given runs.
pub fn line(runs: &[String]) -> String {
    format!("<sn:l>{}</sn:l>", runs.concat())
}

pub fn run(style: &str, text: &str) -> String {
    format!(r#"<sn:r sn:rStyle="{style}"><sn:t>{text}</sn:t><sn:paraend/></sn:r>"#)
}

/// An image element nested three levels below an object carrying
/// `insertimagetype`.
pub fn image_object(rel_id: &str, insert_type: &str) -> String {
    format!(
        r#"<sn:object sn:insertimagetype="{insert_type}"><sn:pic><v:shape><v:imagedata r:id="{rel_id}"/></v:shape></sn:pic></sn:object>"#
    )
}

/// zlib-compressed `.zdib` payload with a 52-byte header.
pub fn zdib(width: u16, height: u16, pixels: &[u8]) -> Vec<u8> {
    let mut raw = vec![0u8; 52];
    raw[4..6].copy_from_slice(&width.to_le_bytes());
    raw[8..10].copy_from_slice(&height.to_le_bytes());
    raw.extend_from_slice(pixels);
    miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6)
}

pub fn red_pixels(count: usize) -> Vec<u8> {
    [255, 0, 0, 255].repeat(count)
}

#[derive(Default)]
pub struct MemorySink {
    pub images: BTreeMap<String, Vec<u8>>,
}

impl ImageSink for MemorySink {
    fn store(&mut self, name: &str, data: &[u8]) -> std::io::Result<()> {
        self.images.insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn link_target(&self, name: &str) -> String {
        format!("images/{name}")
    }
}

/// Render an in-memory archive to a Markdown string.
pub fn render(
    archive: &[u8],
    doc_name: &str,
    options: &snb2md::ConvertOptions,
) -> Result<(String, MemorySink, snb2md::ConversionReport), snb2md::Error> {
    let mut out = Vec::new();
    let mut sink = MemorySink::default();
    let report = snb2md::convert_reader(Cursor::new(archive), doc_name, options, &mut out, &mut sink)?;
    Ok((String::from_utf8(out).unwrap(), sink, report))
}
