//! Recursive-descent parser for the supported LaTeX subset.
//!
//! The parser never fails: anything it cannot make sense of becomes a literal
//! [`MathNode::Run`], and every iteration consumes at least one character.
//!
//! Nested groups are parsed in place over one shared character buffer.
//! Groups nested deeper than [`MAX_DEPTH`] are kept as literal text.

use std::ops::Range;

use super::symbols::read_command;
use super::MathNode;

/// Deepest group nesting that is parsed into structure.
pub const MAX_DEPTH: usize = 256;

/// Characters that can appear inside a plain text run.
fn is_plain(c: char) -> bool {
    c.is_alphanumeric()
        || c.is_whitespace()
        || !c.is_ascii()
        || matches!(
            c,
            '+' | '-' | '=' | '*' | '/' | '(' | ')' | '[' | ']' | '<' | '>' | '|' | '.' | ','
                | ';' | ':' | '!' | '?' | '\'' | '"'
        )
}

fn is_script_marker(c: char) -> bool {
    c == '^' || c == '_'
}

/// Parse `source` into a flat sequence of nodes.
pub(super) fn parse_source(source: &str) -> Vec<MathNode> {
    let chars: Vec<char> = source.chars().collect();
    Parser::new(&chars, 0..chars.len(), 0).parse_sequence()
}

/// A view over `chars[pos..end]` at one group nesting level.
struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    end: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(chars: &'a [char], range: Range<usize>, depth: usize) -> Self {
        Parser {
            chars,
            pos: range.start,
            end: range.end,
            depth,
        }
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        let index = self.pos + offset;
        if index < self.end {
            Some(self.chars[index])
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn parse_sequence(&mut self) -> Vec<MathNode> {
        let mut nodes = Vec::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() && self.peek_at(1).is_some_and(is_script_marker) {
                if let Some(node) = self.parse_scripted() {
                    nodes.push(node);
                    continue;
                }
            }
            match c {
                '\\' => nodes.push(self.parse_command()),
                '{' => {
                    let start = self.pos;
                    if let Some(inner) = self.read_group() {
                        nodes.extend(self.parse_nested(start, inner));
                    }
                }
                _ => nodes.push(self.parse_text()),
            }
        }
        nodes
    }

    /// Parse the group contents `inner`, which were opened at `open`, one
    /// level down. Past [`MAX_DEPTH`] the whole group source stays literal.
    fn parse_nested(&self, open: usize, inner: Range<usize>) -> Vec<MathNode> {
        if self.depth >= MAX_DEPTH {
            let close = (inner.end + 1).min(self.end);
            return vec![MathNode::Run(self.chars[open..close].iter().collect())];
        }
        Parser::new(self.chars, inner, self.depth + 1).parse_sequence()
    }

    fn parse_group(&self, open: usize, inner: Range<usize>) -> MathNode {
        group(self.parse_nested(open, inner))
    }

    /// `x_a`, `x^b`, `x_{a}^{b}` and `x^{b}_{a}`. Restores the position on failure.
    fn parse_scripted(&mut self) -> Option<MathNode> {
        let start = self.pos;
        let base = self.peek()?;
        self.pos += 1;
        let first_marker = self.peek()?;
        self.pos += 1;
        let Some(first) = self.read_script_argument() else {
            self.pos = start;
            return None;
        };

        let second_marker = if first_marker == '_' { '^' } else { '_' };
        if self.peek() == Some(second_marker) {
            let resume = self.pos;
            self.pos += 1;
            if let Some(second) = self.read_script_argument() {
                let (sub, sup) = if first_marker == '_' {
                    (first, second)
                } else {
                    (second, first)
                };
                return Some(MathNode::SubSup {
                    base,
                    sub: Box::new(sub),
                    sup: Box::new(sup),
                });
            }
            self.pos = resume;
        }

        Some(if first_marker == '^' {
            MathNode::Superscript {
                base,
                exponent: Box::new(first),
            }
        } else {
            MathNode::Subscript {
                base,
                subscript: Box::new(first),
            }
        })
    }

    /// A brace group, a single command, or a single character.
    fn read_script_argument(&mut self) -> Option<MathNode> {
        match self.peek()? {
            '{' => {
                let open = self.pos;
                let inner = self.read_group()?;
                Some(self.parse_group(open, inner))
            }
            '\\' => Some(MathNode::Run(self.read_command())),
            c if is_script_marker(c) || c == '}' => None,
            c => {
                self.pos += 1;
                Some(MathNode::Run(c.to_string()))
            }
        }
    }

    fn read_command(&mut self) -> String {
        let (command, next) = read_command(&self.chars[..self.end], self.pos);
        self.pos = next;
        command
    }

    fn parse_command(&mut self) -> MathNode {
        let command = self.read_command();
        match command.as_str() {
            "\\frac" | "\\dfrac" | "\\tfrac" => {
                let resume = self.pos;
                self.skip_whitespace();
                let num_open = self.pos;
                if let Some(num) = self.read_group() {
                    self.skip_whitespace();
                    let den_open = self.pos;
                    if let Some(den) = self.read_group() {
                        return MathNode::Frac {
                            num: Box::new(self.parse_group(num_open, num)),
                            den: Box::new(self.parse_group(den_open, den)),
                        };
                    }
                }
                self.pos = resume;
                MathNode::Run(command)
            }
            "\\sqrt" => {
                let resume = self.pos;
                self.skip_whitespace();
                let degree_open = self.pos;
                let degree = self.read_bracket();
                self.skip_whitespace();
                let radicand_open = self.pos;
                if let Some(radicand) = self.read_group() {
                    return MathNode::Radical {
                        degree: degree.map(|d| Box::new(self.parse_group(degree_open, d))),
                        radicand: Box::new(self.parse_group(radicand_open, radicand)),
                    };
                }
                self.pos = resume;
                MathNode::Run(command)
            }
            _ => MathNode::Run(command),
        }
    }

    /// Maximal plain run, or a single character when nothing plain is ahead.
    fn parse_text(&mut self) -> MathNode {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_plain(c) {
                break;
            }
            if c.is_alphanumeric() && self.peek_at(1).is_some_and(is_script_marker) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            self.pos += 1;
        }
        MathNode::Run(self.chars[start..self.pos].iter().collect())
    }

    /// Range of a balanced `{...}` group's contents starting at the current
    /// position.
    ///
    /// An unclosed group swallows the rest of the input.
    fn read_group(&mut self) -> Option<Range<usize>> {
        self.read_balanced('{', '}')
    }

    /// Contents of an optional `[...]` argument.
    fn read_bracket(&mut self) -> Option<Range<usize>> {
        self.read_balanced('[', ']')
    }

    fn read_balanced(&mut self, open: char, close: char) -> Option<Range<usize>> {
        if self.peek() != Some(open) {
            return None;
        }
        let start = self.pos + 1;
        let mut depth = 0usize;
        let mut i = self.pos;
        while i < self.end {
            let c = self.chars[i];
            if c == '\\' {
                // escaped braces do not count
                i += 2;
                continue;
            }
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    self.pos = i + 1;
                    return Some(start..i);
                }
            }
            i += 1;
        }
        self.pos = self.end;
        Some(start.min(self.end)..self.end)
    }
}

/// Collapse single-element groups.
fn group(mut nodes: Vec<MathNode>) -> MathNode {
    if nodes.len() == 1 {
        nodes.remove(0)
    } else {
        MathNode::Group(nodes)
    }
}
