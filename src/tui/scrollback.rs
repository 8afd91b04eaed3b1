// Scrollback buffer - ordered line history with a capacity bound
//
// Owns every Line the splitter has produced this session, oldest first.
// Appending past capacity evicts from the front; an evicted line is gone,
// ids and all. Splitting and storage stay separate: chunks are split once
// and appended, history is never re-split.

use crate::text::Line;
use std::collections::VecDeque;

/// Default capacity, in lines.
pub const DEFAULT_CAPACITY: usize = 5_000;

pub struct Scrollback {
    lines: VecDeque<Line>,
    capacity: usize,
}

impl Scrollback {
    /// A capacity of zero means unbounded.
    pub fn new(capacity: usize) -> Self {
        Scrollback {
            lines: VecDeque::new(),
            capacity,
        }
    }

    /// Append freshly split lines in order. Returns how many old lines
    /// were evicted to stay within capacity.
    pub fn append(&mut self, lines: Vec<Line>) -> usize {
        self.lines.extend(lines);

        let mut evicted = 0;
        if self.capacity > 0 {
            while self.lines.len() > self.capacity {
                self.lines.pop_front();
                evicted += 1;
            }
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Iterate a window of rows, for rendering the visible slice.
    pub fn window(&self, start: usize, count: usize) -> impl Iterator<Item = &Line> {
        self.lines.iter().skip(start).take(count)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{split_into_lines, TagNode};

    fn lines(text: &str) -> Vec<Line> {
        split_into_lines(vec![TagNode::text(text)])
    }

    #[test]
    fn appends_in_order() {
        let mut scrollback = Scrollback::new(10);
        scrollback.append(lines("a\nb"));
        scrollback.append(lines("c"));

        let texts: Vec<String> = scrollback.window(0, 10).map(Line::text).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn evicts_from_the_front_past_capacity() {
        let mut scrollback = Scrollback::new(3);
        scrollback.append(lines("1\n2\n3"));
        let evicted = scrollback.append(lines("4\n5"));

        assert_eq!(evicted, 2);
        let texts: Vec<String> = scrollback.window(0, 10).map(Line::text).collect();
        assert_eq!(texts, ["3", "4", "5"]);
    }

    #[test]
    fn zero_capacity_is_unbounded() {
        let mut scrollback = Scrollback::new(0);
        for _ in 0..100 {
            assert_eq!(scrollback.append(lines("x")), 0);
        }
        assert_eq!(scrollback.len(), 100);
    }

    #[test]
    fn window_clamps_to_content() {
        let mut scrollback = Scrollback::new(10);
        scrollback.append(lines("a\nb\nc"));
        assert_eq!(scrollback.window(2, 5).count(), 1);
        assert_eq!(scrollback.window(9, 5).count(), 0);
    }
}
