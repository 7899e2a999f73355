/// Lazy pre-order walk over the element nodes below (and including) a root.
///
/// Uses an explicit cursor stack instead of recursion so a note with very deep
/// nesting cannot exhaust the call stack. The stack never holds more than one
/// pending sibling per open ancestor.
pub(crate) struct ElementWalk<'a, 'input> {
    root: roxmltree::Node<'a, 'input>,
    stack: Vec<roxmltree::Node<'a, 'input>>,
}

impl<'a, 'input> ElementWalk<'a, 'input> {
    pub(crate) fn new(root: roxmltree::Node<'a, 'input>) -> Self {
        ElementWalk {
            root,
            stack: vec![root],
        }
    }
}

impl<'a, 'input> Iterator for ElementWalk<'a, 'input> {
    type Item = roxmltree::Node<'a, 'input>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            // Siblings of the root are outside the walk.
            if node != self.root
                && let Some(sibling) = node.next_sibling()
            {
                self.stack.push(sibling);
            }
            if let Some(child) = node.first_child() {
                self.stack.push(child);
            }
            if node.is_element() {
                return Some(node);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(xml: &str) -> Vec<String> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        ElementWalk::new(doc.root_element())
            .map(|n| n.tag_name().name().to_string())
            .collect()
    }

    #[test]
    fn visits_in_document_order() {
        let order = names("<a><b><c/><d/></b>text<e><f/></e><g/></a>");
        assert_eq!(order, ["a", "b", "c", "d", "e", "f", "g"]);
    }

    #[test]
    fn skips_text_and_comments() {
        let order = names("<a>x<!-- note --><b>y</b>z</a>");
        assert_eq!(order, ["a", "b"]);
    }

    #[test]
    fn subtree_walk_stays_inside_subtree() {
        let doc = roxmltree::Document::parse("<a><b><c/></b><d/></a>").unwrap();
        let b = doc.root_element().first_child().unwrap();
        let order: Vec<_> = ElementWalk::new(b).map(|n| n.tag_name().name()).collect();
        assert_eq!(order, ["b", "c"]);
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let depth = crate::snb::MAX_NESTING_DEPTH;
        let mut xml = String::with_capacity(depth * 8);
        for _ in 0..depth {
            xml.push_str("<n>");
        }
        for _ in 0..depth {
            xml.push_str("</n>");
        }
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(ElementWalk::new(doc.root_element()).count(), depth);
    }
}
