// Tag tree flattener - ordered traversal for presentation layers
//
// Rendering never needs the tree shape, only the ordered stream of leaves
// with the elements that enclose them. The walker delivers exactly that to
// a visitor; groups are transparent because they carry no styling.
//
// Pure and reentrant: walking the same tree twice drives the visitor
// through the identical call sequence.

use crate::text::tag::TagNode;
use std::collections::HashMap;

/// Callbacks invoked while flattening a tag tree in document order.
pub trait TagVisitor {
    /// A text leaf. Called once per leaf, empty leaves included.
    fn text(&mut self, text: &str);

    /// An element is being entered. Its children follow before the matching
    /// [`close_element`](Self::close_element).
    fn open_element(&mut self, name: &str, attributes: &HashMap<String, String>);

    /// The most recently opened element is done.
    fn close_element(&mut self, name: &str);
}

/// Flatten one node into visitor calls.
pub fn walk<V: TagVisitor>(node: &TagNode, visitor: &mut V) {
    match node {
        TagNode::Text(text) => visitor.text(text),
        TagNode::Element {
            name,
            attributes,
            children,
        } => {
            visitor.open_element(name, attributes);
            for child in children {
                walk(child, visitor);
            }
            visitor.close_element(name);
        }
        TagNode::Group(children) => {
            for child in children {
                walk(child, visitor);
            }
        }
    }
}

/// Flatten an ordered sequence of nodes, e.g. a line's children.
pub fn walk_all<V: TagVisitor>(nodes: &[TagNode], visitor: &mut V) {
    for node in nodes {
        walk(node, visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl TagVisitor for Recorder {
        fn text(&mut self, text: &str) {
            self.calls.push(format!("text:{text}"));
        }

        fn open_element(&mut self, name: &str, attributes: &HashMap<String, String>) {
            let mut attrs: Vec<_> = attributes
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            attrs.sort();
            self.calls.push(format!("open:{name}[{}]", attrs.join(",")));
        }

        fn close_element(&mut self, name: &str) {
            self.calls.push(format!("close:{name}"));
        }
    }

    #[test]
    fn visits_in_document_order() {
        let tree = TagNode::element(
            "color",
            [("foreground", "red")],
            vec![TagNode::text("a"), TagNode::text("b")],
        );
        let mut recorder = Recorder::default();
        walk(&tree, &mut recorder);
        assert_eq!(
            recorder.calls,
            ["open:color[foreground=red]", "text:a", "text:b", "close:color"]
        );
    }

    #[test]
    fn groups_are_transparent() {
        let tree = TagNode::Group(vec![
            TagNode::text("a"),
            TagNode::Group(vec![TagNode::text("b")]),
        ]);
        let mut recorder = Recorder::default();
        walk(&tree, &mut recorder);
        assert_eq!(recorder.calls, ["text:a", "text:b"]);
    }

    #[test]
    fn walking_twice_produces_identical_sequences() {
        let tree = TagNode::element(
            "sent-text",
            [] as [(&str, &str); 0],
            vec![TagNode::text("look")],
        );
        let mut first = Recorder::default();
        let mut second = Recorder::default();
        walk(&tree, &mut first);
        walk(&tree, &mut second);
        assert_eq!(first.calls, second.calls);
    }
}
