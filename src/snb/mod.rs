pub(crate) mod rels;
pub(crate) mod styles;

use std::io::{Read, Seek};

use crate::error::Error;

pub(crate) use rels::{RelationshipMap, parse_relationships};
pub(crate) use styles::{StyleCatalog, parse_styles};

pub(crate) const VML_NS: &str = "urn:schemas-microsoft-com:vml";
pub(crate) const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const PART_ROOT: &str = "snote";

pub(crate) const STYLES_PART: &str = "styles.xml";
pub(crate) const RELS_PART: &str = "_rels/snote.xml.rels";
pub(crate) const BODY_PART: &str = "snote.xml";

/// Deepest element nesting accepted in any XML part. roxmltree parses
/// recursively, so anything deeper is rejected before it is handed over.
pub(crate) const MAX_NESTING_DEPTH: usize = 1024;

pub(crate) fn check_nesting(part: &str, xml: &str) -> Result<(), Error> {
    if nesting_depth(xml, MAX_NESTING_DEPTH) > MAX_NESTING_DEPTH {
        return Err(Error::NestingTooDeep {
            part: part.to_string(),
            limit: MAX_NESTING_DEPTH,
        });
    }
    Ok(())
}

/// Deepest element nesting in `xml`, found by scanning tags without building
/// a tree. Stops early once the depth passes `stop_after`. Comments, CDATA,
/// processing instructions and declarations never open an element, and a `>`
/// inside a quoted attribute value does not end its tag.
fn nesting_depth(xml: &str, stop_after: usize) -> usize {
    let bytes = xml.as_bytes();
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut pos = 0;
    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'<') {
        let start = pos + offset;
        let rest = &bytes[start..];
        let end = if rest.starts_with(b"<!--") {
            find(bytes, start + 4, b"-->").map(|i| i + 3)
        } else if rest.starts_with(b"<![CDATA[") {
            find(bytes, start + 9, b"]]>").map(|i| i + 3)
        } else if rest.starts_with(b"<?") {
            find(bytes, start + 2, b"?>").map(|i| i + 2)
        } else if rest.starts_with(b"<!") {
            find(bytes, start + 2, b">").map(|i| i + 1)
        } else if rest.starts_with(b"</") {
            depth = depth.saturating_sub(1);
            find(bytes, start + 2, b">").map(|i| i + 1)
        } else {
            let gt = tag_end(bytes, start + 1);
            if let Some(gt) = gt {
                deepest = deepest.max(depth + 1);
                if deepest > stop_after {
                    return deepest;
                }
                // An empty-element tag opens and closes in one go.
                if bytes[gt - 1] != b'/' {
                    depth += 1;
                }
            }
            gt.map(|i| i + 1)
        };
        match end {
            Some(end) => pos = end,
            // Unterminated markup; the parser reports it.
            None => break,
        }
    }
    deepest
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

/// Index of the `>` closing a start tag, skipping quoted attribute values.
fn tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote = None;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }
    None
}

/// Find an attribute by local name, whatever namespace prefix it was written with.
pub(crate) fn attr<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}

pub(crate) fn is_named(node: roxmltree::Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// Descendant elements (excluding `node` itself) with the given local name.
pub(crate) fn descendants_named<'a, 'n: 'a>(
    node: roxmltree::Node<'a, 'a>,
    name: &'n str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'a>> + 'a {
    node.descendants()
        .skip(1)
        .filter(move |n| is_named(*n, name))
}

pub(crate) fn has_descendant(node: roxmltree::Node, name: &str) -> bool {
    descendants_named(node, name).next().is_some()
}

/// An opened `.snb` archive. Parts live under `snote/`; some writers store
/// them with a leading slash, so both spellings are tried.
pub(crate) struct Container<R> {
    zip: zip::ZipArchive<R>,
}

impl<R: Read + Seek> Container<R> {
    pub(crate) fn open(reader: R) -> Result<Self, Error> {
        let zip = zip::ZipArchive::new(reader)
            .map_err(|e| Error::InvalidContainer(format!("file is not a ZIP archive ({e})")))?;
        Ok(Container { zip })
    }

    pub(crate) fn read_part(&mut self, path: &str) -> Result<Vec<u8>, Error> {
        let path = path.trim_start_matches('/');
        for name in [format!("{PART_ROOT}/{path}"), format!("/{PART_ROOT}/{path}")] {
            let mut entry = match self.zip.by_name(&name) {
                Ok(entry) => entry,
                Err(zip::result::ZipError::FileNotFound) => continue,
                Err(e) => return Err(Error::InvalidContainer(format!("{name}: {e}"))),
            };
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            return Ok(data);
        }
        Err(Error::MissingContainerPart(path.to_string()))
    }

    pub(crate) fn read_part_text(&mut self, path: &str) -> Result<String, Error> {
        let data = self.read_part(path)?;
        let text = String::from_utf8(data)
            .map_err(|_| Error::InvalidContainer(format!("snote/{path} is not valid UTF-8")))?;
        Ok(match text.strip_prefix('\u{feff}') {
            Some(rest) => rest.to_string(),
            None => text,
        })
    }
}
