// Tag tree model - the unit of styled text received from the session layer
//
// A chunk of server output is a tree of plain text leaves and named,
// attributed elements (color spans and the like). The splitter and renderer
// both operate over this one type; it carries no behavior beyond construction
// and wire deserialization.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One node of markup in a server chunk.
///
/// Child order is significant and preserved everywhere. `Group` is an
/// unnamed grouping: the session layer never sends one at the top of a
/// `children` list, but the splitter produces them when regrouping runs,
/// and nested arrays on the wire decode to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagNode {
    /// Literal text, possibly containing embedded newlines.
    Text(String),
    /// A named, attributed span wrapping child nodes.
    Element {
        name: String,
        attributes: HashMap<String, String>,
        children: Vec<TagNode>,
    },
    /// An unnamed grouping of nodes. Carries no styling.
    Group(Vec<TagNode>),
}

impl TagNode {
    /// Text leaf from anything string-like.
    pub fn text(text: impl Into<String>) -> Self {
        TagNode::Text(text.into())
    }

    /// Element with attributes given as (key, value) pairs.
    pub fn element<K, V>(
        name: impl Into<String>,
        attributes: impl IntoIterator<Item = (K, V)>,
        children: Vec<TagNode>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        TagNode::Element {
            name: name.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            children,
        }
    }

    /// Concatenate every text leaf in order into `out`.
    ///
    /// Structure is ignored; only the character stream matters. This is the
    /// basis of the content-preservation guarantee the splitter is tested
    /// against, and of plain-text export of a line.
    pub fn text_content(&self, out: &mut String) {
        match self {
            TagNode::Text(text) => out.push_str(text),
            TagNode::Element { children, .. } | TagNode::Group(children) => {
                for child in children {
                    child.text_content(out);
                }
            }
        }
    }
}

impl From<&str> for TagNode {
    fn from(text: &str) -> Self {
        TagNode::Text(text.to_string())
    }
}

impl From<String> for TagNode {
    fn from(text: String) -> Self {
        TagNode::Text(text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────────────────────────────────────

// Serialization mirrors the wire shapes below, so a recorded transcript
// replays byte-for-byte through the same codec.
impl Serialize for TagNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TagNode::Text(text) => serializer.serialize_str(text),
            TagNode::Group(children) => children.serialize(serializer),
            TagNode::Element {
                name,
                attributes,
                children,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("attributes", attributes)?;
                map.serialize_entry("children", children)?;
                map.end()
            }
        }
    }
}

// The session protocol sends a tag as one of three JSON shapes:
//   "text"                                        -> Text
//   {"name": .., "attributes": {..}, "children": ..} -> Element
//   [tag, tag, ..]                                -> Group
// An element's "children" may itself be a single tag rather than an array,
// and "attributes"/"children" may be omitted entirely. Anything else is a
// protocol bug and fails deserialization outright.
impl<'de> Deserialize<'de> for TagNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TagNodeVisitor)
    }
}

struct TagNodeVisitor;

impl<'de> Visitor<'de> for TagNodeVisitor {
    type Value = TagNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, an array of tags, or a tag object")
    }

    fn visit_str<E>(self, value: &str) -> Result<TagNode, E>
    where
        E: de::Error,
    {
        Ok(TagNode::Text(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<TagNode, E>
    where
        E: de::Error,
    {
        Ok(TagNode::Text(value))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<TagNode, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut children = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(child) = seq.next_element()? {
            children.push(child);
        }
        Ok(TagNode::Group(children))
    }

    fn visit_map<A>(self, mut map: A) -> Result<TagNode, A::Error>
    where
        A: MapAccess<'de>,
    {
        // "children" accepts a single tag or an array of tags.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(TagNode),
            Many(Vec<TagNode>),
        }

        let mut name: Option<String> = None;
        let mut attributes: Option<HashMap<String, String>> = None;
        let mut children: Option<OneOrMany> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "name" => name = Some(map.next_value()?),
                "attributes" => attributes = Some(map.next_value()?),
                "children" => children = Some(map.next_value()?),
                other => return Err(de::Error::unknown_field(other, &["name", "attributes", "children"])),
            }
        }

        let name = name.ok_or_else(|| de::Error::missing_field("name"))?;
        let children = match children {
            Some(OneOrMany::One(tag)) => vec![tag],
            Some(OneOrMany::Many(tags)) => tags,
            None => Vec::new(),
        };

        Ok(TagNode::Element {
            name,
            attributes: attributes.unwrap_or_default(),
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_bare_string_as_text() {
        let tag: TagNode = serde_json::from_str(r#""hello""#).unwrap();
        assert_eq!(tag, TagNode::text("hello"));
    }

    #[test]
    fn deserializes_array_as_group() {
        let tag: TagNode = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(tag, TagNode::Group(vec![TagNode::text("a"), TagNode::text("b")]));
    }

    #[test]
    fn deserializes_element_with_attributes() {
        let json = r#"{"name": "color", "attributes": {"foreground": "red"}, "children": ["hi"]}"#;
        let tag: TagNode = serde_json::from_str(json).unwrap();
        assert_eq!(
            tag,
            TagNode::element("color", [("foreground", "red")], vec![TagNode::text("hi")])
        );
    }

    #[test]
    fn element_children_may_be_single_tag() {
        let json = r#"{"name": "sent-text", "children": "look"}"#;
        let tag: TagNode = serde_json::from_str(json).unwrap();
        assert_eq!(tag, TagNode::element("sent-text", [] as [(&str, &str); 0], vec![TagNode::text("look")]));
    }

    #[test]
    fn element_without_children_is_empty() {
        let json = r#"{"name": "hr"}"#;
        let tag: TagNode = serde_json::from_str(json).unwrap();
        match tag {
            TagNode::Element { name, children, .. } => {
                assert_eq!(name, "hr");
                assert!(children.is_empty());
            }
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn malformed_tag_is_rejected() {
        // An object without "name" is a protocol bug, not a tag.
        assert!(serde_json::from_str::<TagNode>(r#"{"children": []}"#).is_err());
        assert!(serde_json::from_str::<TagNode>("42").is_err());
    }

    #[test]
    fn text_content_walks_depth_first() {
        let tag = TagNode::Group(vec![
            TagNode::text("a"),
            TagNode::element("color", [("foreground", "red")], vec![TagNode::text("b"), TagNode::text("c")]),
            TagNode::text("d"),
        ]);
        let mut out = String::new();
        tag.text_content(&mut out);
        assert_eq!(out, "abcd");
    }
}
