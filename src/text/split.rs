// Line splitter - turns one inbound chunk into renderable lines
//
// A chunk may carry newlines anywhere inside its leaves, at any nesting
// depth. Splitting rewrites the tree into one independent tag tree per
// display row, re-opening styled elements on every row their content spans:
// a color span containing "a\nb" comes out as one color element on the "a"
// line and another (same name, same attributes) on the "b" line.
//
// The break marker is a private sum type, so the type system keeps it from
// ever escaping into a produced Line.

use crate::text::tag::TagNode;
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a [`Line`], generated once at creation.
///
/// Random 128-bit ids make collisions negligible at session scale, and a
/// fresh split of identical content yields fresh ids - consumers key
/// row-diffing on them, so identity must never be derived from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(Uuid);

impl LineId {
    fn generate() -> Self {
        LineId(Uuid::new_v4())
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_simple())
    }
}

/// One fully segmented renderable row.
///
/// Immutable after creation: the splitter is the only constructor, and the
/// fields are only readable. A line lives until the scrollback buffer
/// evicts it.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    children: Vec<TagNode>,
}

impl Line {
    fn new(children: Vec<TagNode>) -> Self {
        Line {
            id: LineId::generate(),
            children,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn children(&self) -> &[TagNode] {
        &self.children
    }

    /// Plain text of the row, styling stripped.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.text_content(&mut out);
        }
        out
    }
}

/// Split marker interleaved with nodes during segmentation. Never leaves
/// this module.
enum Segment {
    Node(TagNode),
    Break,
}

/// Split one inbound chunk into display lines.
///
/// Total over any tree: there is no failure mode, only output. Empty input
/// produces no lines; otherwise a chunk whose text carries `n` newlines
/// produces `n + 1` lines, the last one empty when the text ends with a
/// newline (a blank row is a meaningful row).
///
/// Each call allocates fresh lines with fresh ids. Append the result to
/// existing scrollback; never re-split history.
pub fn split_into_lines(input: Vec<TagNode>) -> Vec<Line> {
    if input.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    for node in input {
        segment_node(node, &mut segments);
    }

    group_runs(segments).into_iter().map(Line::new).collect()
}

/// Segment a single node, appending nodes and break markers to `out`.
///
/// Composite nodes regroup their children's segments into runs and re-wrap
/// each run: an element re-opens itself (same name and attributes) around
/// every run, a group passes runs through as fresh unstyled groups.
fn segment_node(node: TagNode, out: &mut Vec<Segment>) {
    match node {
        TagNode::Text(text) => segment_text(&text, out),

        TagNode::Element {
            name,
            attributes,
            children,
        } => {
            let mut inner = Vec::new();
            for child in children {
                segment_node(child, &mut inner);
            }
            let runs = group_runs(inner);
            let breaks = runs.len() - 1;
            for (i, run) in runs.into_iter().enumerate() {
                out.push(Segment::Node(TagNode::Element {
                    name: name.clone(),
                    attributes: attributes.clone(),
                    children: run,
                }));
                if i < breaks {
                    out.push(Segment::Break);
                }
            }
        }

        TagNode::Group(children) => {
            let mut inner = Vec::new();
            for child in children {
                segment_node(child, &mut inner);
            }
            let runs = group_runs(inner);
            let breaks = runs.len() - 1;
            for (i, run) in runs.into_iter().enumerate() {
                out.push(Segment::Node(TagNode::Group(run)));
                if i < breaks {
                    out.push(Segment::Break);
                }
            }
        }
    }
}

/// Rewrite a leaf as fragments interleaved with break markers.
///
/// Equivalent to "first break consumed, the rest interleaved verbatim":
/// every fragment from splitting on '\n' is kept, including empty ones, so
/// "a\n" yields ["a", Break, ""] and a trailing newline turns into a
/// trailing empty row upstream.
fn segment_text(text: &str, out: &mut Vec<Segment>) {
    for (i, fragment) in text.split('\n').enumerate() {
        if i > 0 {
            out.push(Segment::Break);
        }
        out.push(Segment::Node(TagNode::Text(fragment.to_string())));
    }
}

/// Collect runs of nodes between break markers.
///
/// Always returns `breaks + 1` runs; runs at either end may be empty, which
/// is what makes leading and trailing newlines produce blank rows.
fn group_runs(segments: Vec<Segment>) -> Vec<Vec<TagNode>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for segment in segments {
        match segment {
            Segment::Break => runs.push(std::mem::take(&mut current)),
            Segment::Node(node) => current.push(node),
        }
    }
    runs.push(current);
    runs
}
