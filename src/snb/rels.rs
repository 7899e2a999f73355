use std::collections::HashMap;

use crate::error::Error;

use super::{RELS_PART, attr, check_nesting, is_named};

/// Relationship id → resource path relative to the `snote/` root.
#[derive(Debug, Default)]
pub(crate) struct RelationshipMap {
    targets: HashMap<String, String>,
}

impl RelationshipMap {
    pub(crate) fn resolve(&self, rel_id: &str) -> Result<&str, Error> {
        self.targets
            .get(rel_id)
            .map(String::as_str)
            .ok_or_else(|| Error::UnresolvedRelationship(rel_id.to_string()))
    }

    pub(crate) fn len(&self) -> usize {
        self.targets.len()
    }
}

pub(crate) fn parse_relationships(xml_content: &str) -> Result<RelationshipMap, Error> {
    check_nesting(RELS_PART, xml_content)?;
    let xml = roxmltree::Document::parse(xml_content)
        .map_err(|e| Error::MalformedRelationshipMap(e.to_string()))?;

    let mut targets = HashMap::new();
    for node in xml.root_element().descendants() {
        if !is_named(node, "Relationship") {
            continue;
        }
        let (Some(id), Some(target)) = (attr(node, "Id"), attr(node, "Target")) else {
            return Err(Error::MalformedRelationshipMap(format!(
                "Relationship at offset {} needs both Id and Target",
                node.range().start
            )));
        };
        targets.insert(id.to_string(), target.to_string());
    }

    log::debug!("Loaded {} relationships", targets.len());
    Ok(RelationshipMap { targets })
}
