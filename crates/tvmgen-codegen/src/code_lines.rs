//! Indentation-aware instruction log.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    depth: usize,
    text: String,
}

/// Ordered instruction text with a current indentation depth.
///
/// Depth is tracked per line rather than baked into the text, so a log can
/// be spliced into another one at any depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeLines {
    lines: Vec<Line>,
    depth: usize,
}

impl CodeLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line at the current depth.
    ///
    /// Empty text and a lone newline are ignored. A single space asks for
    /// a blank separator line.
    pub fn push(&mut self, text: &str) {
        if text.is_empty() || text == "\n" {
            return;
        }
        if text == " " {
            self.lines.push(Line {
                depth: 0,
                text: String::new(),
            });
        } else {
            self.lines.push(Line {
                depth: self.depth,
                text: text.to_string(),
            });
        }
    }

    pub fn start_continuation(&mut self) {
        self.push("PUSHCONT {");
        self.depth += 1;
    }

    pub fn end_continuation(&mut self) {
        self.sub_tabs(1);
        self.push("}");
    }

    pub fn add_tabs(&mut self, n: usize) {
        self.depth += n;
    }

    pub fn sub_tabs(&mut self, n: usize) {
        assert!(
            n <= self.depth,
            "indentation underflow: depth {} minus {}",
            self.depth,
            n
        );
        self.depth -= n;
    }

    /// Splice `other` in, re-indented relative to the current depth.
    pub fn append(&mut self, other: &CodeLines) {
        for line in &other.lines {
            let depth = if line.text.is_empty() {
                0
            } else {
                self.depth + line.depth
            };
            self.lines.push(Line {
                depth,
                text: line.text.clone(),
            });
        }
    }

    /// Drop a final `RET`, which falls through implicitly at the end of a body.
    pub fn pop_trailing_ret(&mut self) -> bool {
        match self.lines.last() {
            Some(line) if line.text == "RET" => {
                self.lines.pop();
                true
            }
            _ => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_balanced(&self) -> bool {
        self.depth == 0
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Lines with indentation rendered as tab characters.
    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().map(render_line).collect()
    }

    /// Lines without indentation, as a flat instruction listing.
    pub fn instructions(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| !l.text.is_empty())
            .map(|l| l.text.as_str())
            .collect()
    }

    /// Render with `indent` prepended to every non-blank line.
    pub fn render(&self, indent: &str) -> String {
        let mut out = String::new();
        for line in &self.lines {
            if !line.text.is_empty() {
                out.push_str(indent);
            }
            out.push_str(&render_line(line));
            out.push('\n');
        }
        out
    }
}

fn render_line(line: &Line) -> String {
    let mut s = "\t".repeat(line.depth);
    s.push_str(&line.text);
    s
}

impl fmt::Display for CodeLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}
