use std::collections::HashMap;

use crate::error::Error;
use crate::model::StyleRecord;

use super::{STYLES_PART, attr, check_nesting, has_descendant, is_named};

/// Character styles keyed by `styleId`.
#[derive(Debug, Default)]
pub(crate) struct StyleCatalog {
    styles: HashMap<String, StyleRecord>,
}

impl StyleCatalog {
    pub(crate) fn get(&self, style_id: &str) -> Option<&StyleRecord> {
        self.styles.get(style_id)
    }

    /// Runs reference their style by number (`sn:rStyle="3"`) while the
    /// catalog stores it as `Character3`.
    pub(crate) fn for_run(&self, run_style: &str) -> Option<&StyleRecord> {
        self.get(&format!("Character{run_style}"))
            .or_else(|| self.get(run_style))
    }

    pub(crate) fn len(&self) -> usize {
        self.styles.len()
    }
}

pub(crate) fn parse_styles(xml_content: &str) -> Result<StyleCatalog, Error> {
    check_nesting(STYLES_PART, xml_content)?;
    let xml = roxmltree::Document::parse(xml_content)
        .map_err(|e| Error::MalformedStyleCatalog(e.to_string()))?;

    let mut styles = HashMap::new();
    for node in xml.root_element().descendants() {
        if !is_named(node, "style") {
            continue;
        }
        let Some(kind) = attr(node, "type") else {
            return Err(Error::MalformedStyleCatalog(format!(
                "style element at offset {} has no type",
                node.range().start
            )));
        };
        if kind != "character" {
            continue;
        }
        let Some(style_id) = attr(node, "styleId") else {
            return Err(Error::MalformedStyleCatalog(format!(
                "character style at offset {} has no styleId",
                node.range().start
            )));
        };
        styles.insert(
            style_id.to_string(),
            StyleRecord {
                bold: has_descendant(node, "b"),
                italic: has_descendant(node, "i"),
                underline: has_descendant(node, "u"),
            },
        );
    }

    log::debug!("Loaded {} character styles", styles.len());
    Ok(StyleCatalog { styles })
}
