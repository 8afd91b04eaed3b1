// Line renderer - flattens a tag tree into styled text runs
//
// The renderer is the presentation half of the pipeline: it walks a line's
// tag tree and produces a flat sequence of runs, each a piece of literal
// text with its resolved foreground/background. It owns no state beyond a
// borrowed theme, so rendering the same line twice with the same theme is
// guaranteed to produce identical output (scrollback consumers key caching
// on the line id).
//
// Dispatch is by element name over an open set: "color" and "sent-text"
// are understood, anything else renders its children only - presentation
// intent is dropped, content never is.

pub mod color;

pub use color::{resolve_color, ColorValue};

use crate::text::{walk_all, Line, TagVisitor};
use crate::theme::Theme;
use std::collections::HashMap;

/// One styled fragment of a rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub foreground: Option<ColorValue>,
    pub background: Option<ColorValue>,
}

/// Style context inherited down the tree during flattening.
#[derive(Debug, Clone, Default)]
struct RunStyle {
    foreground: Option<ColorValue>,
    background: Option<ColorValue>,
}

/// Renders lines against an injected theme.
pub struct LineRenderer<'a> {
    theme: &'a Theme,
}

impl<'a> LineRenderer<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        LineRenderer { theme }
    }

    /// Flatten one line into runs. Empty leaves produce no runs, so a
    /// blank row renders as an empty sequence.
    pub fn render_line(&self, line: &Line) -> Vec<TextRun> {
        let mut builder = RunBuilder {
            theme: self.theme,
            stack: Vec::new(),
            echo_depth: 0,
            runs: Vec::new(),
        };
        walk_all(line.children(), &mut builder);
        builder.runs
    }
}

struct RunBuilder<'a> {
    theme: &'a Theme,
    stack: Vec<RunStyle>,
    /// Depth of enclosing "sent-text" elements. While non-zero, nested
    /// color elements are ignored: echoed input renders in one fixed color.
    echo_depth: usize,
    runs: Vec<TextRun>,
}

impl RunBuilder<'_> {
    fn current(&self) -> RunStyle {
        self.stack.last().cloned().unwrap_or_default()
    }
}

impl TagVisitor for RunBuilder<'_> {
    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let style = self.current();
        self.runs.push(TextRun {
            text: text.to_string(),
            foreground: style.foreground,
            background: style.background,
        });
    }

    fn open_element(&mut self, name: &str, attributes: &HashMap<String, String>) {
        let mut style = self.current();

        match name {
            "color" if self.echo_depth == 0 => {
                if let Some(raw) = attributes.get("foreground") {
                    style.foreground =
                        Some(resolve_color(raw, self.theme.lookup_foreground(raw)));
                }
                if let Some(raw) = attributes.get("background") {
                    style.background =
                        Some(resolve_color(raw, self.theme.lookup_background(raw)));
                }
            }
            "sent-text" => {
                self.echo_depth += 1;
                let echo = self.theme.echo_value();
                style.foreground = Some(resolve_color(echo, None));
            }
            // Unknown element: keep the inherited style, render children.
            _ => {}
        }

        self.stack.push(style);
    }

    fn close_element(&mut self, name: &str) {
        if name == "sent-text" {
            self.echo_depth -= 1;
        }
        self.stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{split_into_lines, TagNode};

    fn one_line(chunk: TagNode) -> Line {
        let mut lines = split_into_lines(vec![chunk]);
        assert_eq!(lines.len(), 1);
        lines.remove(0)
    }

    #[test]
    fn plain_text_renders_unstyled() {
        let theme = Theme::default_dark();
        let runs = LineRenderer::new(&theme).render_line(&one_line(TagNode::text("hello")));
        assert_eq!(
            runs,
            [TextRun {
                text: "hello".to_string(),
                foreground: None,
                background: None,
            }]
        );
    }

    #[test]
    fn color_element_resolves_through_theme() {
        let theme = Theme::default_dark();
        let chunk = TagNode::element(
            "color",
            [("foreground", "red"), ("background", "black")],
            vec![TagNode::text("alert")],
        );
        let runs = LineRenderer::new(&theme).render_line(&one_line(chunk));
        assert_eq!(runs[0].foreground, Some(ColorValue::Rgb(0xd7, 0x1e, 0x00)));
        assert_eq!(runs[0].background, Some(ColorValue::Rgb(0, 0, 0)));
    }

    #[test]
    fn nested_color_overrides_only_what_it_sets() {
        let theme = Theme::default_dark();
        let chunk = TagNode::element(
            "color",
            [("background", "blue")],
            vec![TagNode::element(
                "color",
                [("foreground", "white")],
                vec![TagNode::text("sea")],
            )],
        );
        let runs = LineRenderer::new(&theme).render_line(&one_line(chunk));
        // Inner span keeps the outer background while setting its own fg.
        assert_eq!(runs[0].foreground, Some(ColorValue::Rgb(0xdb, 0xde, 0xd8)));
        assert_eq!(runs[0].background, Some(ColorValue::Rgb(0x41, 0x7a, 0xb3)));
    }

    #[test]
    fn unknown_element_renders_children_only() {
        let theme = Theme::default_dark();
        let chunk = TagNode::element(
            "tooltip",
            [("text", "ignored")],
            vec![TagNode::text("content survives")],
        );
        let runs = LineRenderer::new(&theme).render_line(&one_line(chunk));
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "content survives");
        assert_eq!(runs[0].foreground, None);
    }

    #[test]
    fn sent_text_forces_echo_color_over_nested_color() {
        let theme = Theme::default_dark();
        let chunk = TagNode::element(
            "sent-text",
            [] as [(&str, &str); 0],
            vec![
                TagNode::text("say "),
                TagNode::element(
                    "color",
                    [("foreground", "red")],
                    vec![TagNode::text("hello")],
                ),
            ],
        );
        let runs = LineRenderer::new(&theme).render_line(&one_line(chunk));
        let echo = Some(ColorValue::Rgb(0xdb, 0xde, 0xd8));
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].foreground, echo);
        assert_eq!(runs[1].foreground, echo, "nested color must not override echo");
    }

    #[test]
    fn unresolvable_color_passes_through() {
        let theme = Theme::default_dark();
        let chunk = TagNode::element(
            "color",
            [("foreground", "chartreuse-ish")],
            vec![TagNode::text("?")],
        );
        let runs = LineRenderer::new(&theme).render_line(&one_line(chunk));
        assert_eq!(
            runs[0].foreground,
            Some(ColorValue::Named("chartreuse-ish".to_string()))
        );
    }

    #[test]
    fn blank_line_renders_to_no_runs() {
        let theme = Theme::default_dark();
        let lines = split_into_lines(vec![TagNode::text("a\n")]);
        let runs = LineRenderer::new(&theme).render_line(&lines[1]);
        assert!(runs.is_empty());
    }

    #[test]
    fn rendering_is_idempotent() {
        let theme = Theme::default_dark();
        let line = one_line(TagNode::element(
            "color",
            [("foreground", "256:208")],
            vec![TagNode::text("ember")],
        ));
        let renderer = LineRenderer::new(&theme);
        assert_eq!(renderer.render_line(&line), renderer.render_line(&line));
    }
}
