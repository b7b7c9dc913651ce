/// Per-line tokenizer separating code from strings and comments
///
/// Only the characters that matter for delimiting regions are inspected:
/// quotes, backticks, `${`/`}` inside template literals and comment
/// openers. Everything else is left to the caller. A block comment or
/// template literal that spans lines is not tracked across lines.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Code,
    Str,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub region: Region,
    pub text: &'a str,
}

struct Lexer<'a> {
    line: &'a str,
    bytes: &'a [u8],
    pos: usize,
    start: usize,
    segments: Vec<Segment<'a>>,
    /// Brace depth at which each open `${` substitution was entered
    substitutions: Vec<usize>,
    depth: usize,
}

impl<'a> Lexer<'a> {
    fn new(line: &'a str) -> Self {
        Lexer {
            line,
            bytes: line.as_bytes(),
            pos: 0,
            start: 0,
            segments: Vec::new(),
            substitutions: Vec::new(),
            depth: 0,
        }
    }

    fn peek_at(&self, pos: usize) -> Option<u8> {
        self.bytes.get(pos).copied()
    }

    fn push(&mut self, region: Region, end: usize) {
        if end > self.start {
            self.segments.push(Segment {
                region,
                text: &self.line[self.start..end],
            });
        }
        self.start = end;
    }

    fn run(mut self) -> Vec<Segment<'a>> {
        let mut in_template = false;

        while self.pos < self.bytes.len() {
            let ch = self.bytes[self.pos];

            if in_template {
                match ch {
                    b'\\' => self.pos += 2,
                    b'`' => {
                        self.push(Region::Str, self.pos + 1);
                        self.pos += 1;
                        in_template = false;
                    }
                    b'$' if self.peek_at(self.pos + 1) == Some(b'{') => {
                        self.push(Region::Str, self.pos + 2);
                        self.pos += 2;
                        self.substitutions.push(self.depth);
                        in_template = false;
                    }
                    _ => self.pos += 1,
                }
                continue;
            }

            match ch {
                b'/' if self.peek_at(self.pos + 1) == Some(b'/') => {
                    self.push(Region::Code, self.pos);
                    self.push(Region::Comment, self.bytes.len());
                    self.pos = self.bytes.len();
                }
                b'/' if self.peek_at(self.pos + 1) == Some(b'*') => {
                    self.push(Region::Code, self.pos);
                    let end = self.line[self.pos + 2..]
                        .find("*/")
                        .map(|offset| self.pos + 2 + offset + 2)
                        .unwrap_or(self.bytes.len());
                    self.push(Region::Comment, end);
                    self.pos = end;
                }
                b'\'' | b'"' => {
                    self.push(Region::Code, self.pos);
                    let end = self.string_end(ch);
                    self.push(Region::Str, end);
                    self.pos = end;
                }
                b'`' => {
                    self.push(Region::Code, self.pos);
                    self.pos += 1;
                    in_template = true;
                }
                b'{' => {
                    self.depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    if self.substitutions.last() == Some(&self.depth) {
                        // closes a `${` substitution, back inside the template
                        self.substitutions.pop();
                        self.push(Region::Code, self.pos);
                        self.pos += 1;
                        in_template = true;
                    } else {
                        self.depth = self.depth.saturating_sub(1);
                        self.pos += 1;
                    }
                }
                _ => self.pos += 1,
            }
        }

        let region = if in_template { Region::Str } else { Region::Code };
        self.push(region, self.bytes.len());
        self.segments
    }

    /// Byte index just past the closing quote, or end of line
    fn string_end(&self, quote: u8) -> usize {
        let mut pos = self.pos + 1;
        while pos < self.bytes.len() {
            match self.bytes[pos] {
                b'\\' => pos += 2,
                ch if ch == quote => return pos + 1,
                _ => pos += 1,
            }
        }
        self.bytes.len()
    }
}

/// Split a line into code, string and comment segments. Concatenating the
/// segment texts yields the original line.
pub fn segments(line: &str) -> Vec<Segment<'_>> {
    Lexer::new(line).run()
}

/// The line with every comment removed and trailing whitespace trimmed
pub fn strip_comments(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for segment in segments(line) {
        if segment.region != Region::Comment {
            out.push_str(segment.text);
        }
    }
    out.trim_end().to_string()
}

/// True when the line holds nothing but a comment
pub fn is_comment_only(line: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with('*') {
        // continuation of a multi-line block comment
        return true;
    }
    !trimmed.is_empty() && strip_comments(line).trim().is_empty()
}
