/// Block transformers: one per section kind of the options object
///
/// Every transformer appends composable-style lines to a shared body at
/// level 1 (inside the composable function), rewriting receiver
/// references on the way.

use std::collections::BTreeSet;
use std::ops::Range;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::transpiler::analyzer::{Namespace, SymbolKind};
use crate::transpiler::ast::{Block, Entry, Hook, SectionKind};
use crate::transpiler::lines::{self, is_ident_char};
use crate::transpiler::rewriter::Rewriter;

const KEY: &str = r#"([\w$]+|'[^']*'|"[^"]*")"#;

lazy_static! {
    // foo(a, b): Type {    async foo() {    'a.b'(val) {
    static ref SHORTHAND: Regex = Regex::new(&format!(
        r"^(async\s+)?\*?\s*{}\s*\((.*)\)\s*(?::\s*(.+?))?\s*\{{$",
        KEY
    ))
    .unwrap();
    // foo: async function (a): Type {
    static ref FUNCTION: Regex = Regex::new(&format!(
        r"^{}\s*:\s*(async\s+)?function\s*\*?\s*[\w$]*\s*\((.*)\)\s*(?::\s*(.+?))?\s*\{{$",
        KEY
    ))
    .unwrap();
    // foo: async (a): Type => {    foo: a => {
    static ref ARROW: Regex = Regex::new(&format!(
        r"^{}\s*:\s*(async\s+)?(?:\((.*)\)|([\w$]+))\s*(?::\s*(.+?))?\s*=>\s*\{{$",
        KEY
    ))
    .unwrap();
}

/// A member that is a function: `foo(a) {`, `foo: function (a) {`,
/// `foo: (a) => {`
#[derive(Debug, Clone, PartialEq)]
pub struct FnHeader {
    pub key: String,
    pub is_async: bool,
    pub params: String,
    pub return_type: Option<String>,
}

impl FnHeader {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Some(caps) = SHORTHAND.captures(line) {
            return Some(Self::from_captures(&caps, 2, 1, 3, 4));
        }
        if let Some(caps) = FUNCTION.captures(line) {
            return Some(Self::from_captures(&caps, 1, 2, 3, 4));
        }
        if let Some(caps) = ARROW.captures(line) {
            let mut header = Self::from_captures(&caps, 1, 2, 3, 5);
            if let Some(single) = caps.get(4) {
                header.params = single.as_str().to_string();
            }
            return Some(header);
        }
        None
    }

    fn from_captures(caps: &Captures, key: usize, is_async: usize, params: usize, ret: usize) -> Self {
        let text = |i: usize| caps.get(i).map(|m| m.as_str().trim().to_string());
        FnHeader {
            key: unquote(caps.get(key).map(|m| m.as_str()).unwrap_or_default()).to_string(),
            is_async: caps.get(is_async).is_some(),
            params: text(params)
                .map(|p| p.trim_end_matches(',').trim_end().to_string())
                .unwrap_or_default(),
            return_type: text(ret).filter(|t| !t.is_empty()),
        }
    }

    fn async_prefix(&self) -> &'static str {
        if self.is_async {
            "async "
        } else {
            ""
        }
    }
}

/// `key: value` → (key, value). Quoted keys are unquoted.
pub fn split_member(line: &str) -> Option<(String, &str)> {
    let line = line.trim();
    let key_end = match line.chars().next()? {
        quote @ ('\'' | '"') => line[1..].find(quote)? + 2,
        _ => line.find(|c: char| !is_ident_char(c)).unwrap_or(line.len()),
    };
    if key_end == 0 {
        return None;
    }
    let value = line[key_end..].trim_start().strip_prefix(':')?;
    Some((unquote(&line[..key_end]).to_string(), value.trim()))
}

pub fn unquote(text: &str) -> &str {
    let text = text.trim();
    for quote in ['\'', '"', '`'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

pub fn strip_trailing_comma(text: &str) -> &str {
    let text = text.trim_end();
    text.strip_suffix(',').unwrap_or(text).trim_end()
}

fn is_string_literal(text: &str) -> bool {
    let text = text.trim();
    unquote(text).len() + 2 == text.len()
}

pub struct BlockTransformer<'a> {
    lines: &'a [&'a str],
    namespace: &'a Namespace,
    rewriter: Rewriter<'a>,
    unit: usize,
    out: Vec<String>,
    uses: BTreeSet<String>,
    dropped: BTreeSet<String>,
}

/// What the transformers produced for one options object
pub struct Generated {
    pub body: Vec<String>,
    /// Framework primitives the body references
    pub uses: BTreeSet<String>,
    /// Declarations left for manual review, so never declared in the body
    pub dropped: BTreeSet<String>,
}

impl<'a> BlockTransformer<'a> {
    pub fn new(lines: &'a [&'a str], namespace: &'a Namespace, unit: usize) -> Self {
        BlockTransformer {
            lines,
            namespace,
            rewriter: Rewriter::new(namespace),
            unit,
            out: Vec::new(),
            uses: BTreeSet::new(),
            dropped: BTreeSet::new(),
        }
    }

    pub fn finish(self) -> Generated {
        Generated {
            body: self.out,
            uses: self.uses,
            dropped: self.dropped,
        }
    }

    pub fn transform(&mut self, block: &Block) {
        match block.kind {
            SectionKind::State => self.transform_state(block),
            SectionKind::Computed => self.transform_computed(block),
            SectionKind::Methods => self.transform_methods(block),
            SectionKind::Watch => self.transform_watch(block),
            SectionKind::Hook(hook) => self.transform_hook(block, hook),
            SectionKind::Props | SectionKind::Mixins | SectionKind::Passthrough => {}
        }
    }

    /// Carry a comment line from the options object into the body
    pub fn comment(&mut self, line: &str) {
        self.separate();
        self.push(1, line.trim());
    }

    /// Blank line between generated sections
    pub fn separate(&mut self) {
        if self.out.last().is_some_and(|line| !line.is_empty() && !line.trim_start().starts_with("//")) {
            self.out.push(String::new());
        }
    }

    fn transform_state(&mut self, block: &Block) {
        self.uses.insert("reactive".to_string());
        let (prelude, state) = lines::state_ranges(self.lines, block);

        if let Some(depth) = lines::depth_of(self.lines, prelude.clone()) {
            self.copy_range(prelude, depth, 1);
        }

        match lines::depth_of(self.lines, state.clone()) {
            Some(depth) => {
                self.push(1, "const data = reactive({");
                self.copy_range(state, depth, 2);
                self.push(1, "})");
            }
            None => self.push(1, "const data = reactive({})"),
        }
    }

    fn transform_computed(&mut self, block: &Block) {
        for entry in lines::entries(self.lines, block.span.body.clone()) {
            self.uses.insert("computed".to_string());
            let header = lines::header_text(self.lines, &entry);
            let header = header.trim();

            if let Some(f) = FnHeader::parse(header) {
                // getter only
                let annotation = match &f.return_type {
                    Some(ty) => {
                        self.uses.insert("Ref".to_string());
                        format!(": Ref<{}>", ty)
                    }
                    None => String::new(),
                };
                self.push(1, format!("const {}{} = computed(() => {{", f.key, annotation));
                self.copy_range(entry.body.clone(), entry.depth, 1);
                self.push(1, "})");
                continue;
            }

            let Some((name, value)) = split_member(header) else {
                self.unconverted(&entry, "computed");
                continue;
            };

            if value == "{" {
                // get/set pair
                self.push(1, format!("const {} = computed({{", name));
                self.copy_range(entry.body.clone(), entry.depth, 1);
                self.push(1, "})");
            } else if entry.is_single_line() {
                let value = strip_trailing_comma(value);
                let expr = match value.strip_prefix("()") {
                    Some(rest) => match rest.trim_start().strip_prefix("=>") {
                        Some(body) => format!("() => {}", self.rewriter.rewrite(body.trim())),
                        None => self.rewriter.rewrite(value),
                    },
                    None => self.rewriter.rewrite(value),
                };
                self.push(1, format!("const {} = computed({})", name, expr));
            } else {
                self.unconverted(&entry, "computed");
            }
        }
    }

    fn transform_methods(&mut self, block: &Block) {
        for entry in lines::entries(self.lines, block.span.body.clone()) {
            let header = lines::header_text(self.lines, &entry);
            let header = header.trim();

            if let Some(f) = FnHeader::parse(header) {
                let ret = f
                    .return_type
                    .as_ref()
                    .map(|ty| format!(": {}", ty))
                    .unwrap_or_default();
                self.push(
                    1,
                    format!("{}function {}({}){} {{", f.async_prefix(), f.key, f.params, ret),
                );
                self.copy_range(entry.body.clone(), entry.depth, 1);
                self.close(&entry, "}");
                continue;
            }

            match split_member(header) {
                Some((name, value)) if entry.is_single_line() => {
                    let value = self.rewriter.rewrite(strip_trailing_comma(value));
                    self.push(1, format!("const {} = {}", name, value));
                }
                Some((name, value)) => {
                    // wrapped function, e.g. `search: debounce(function () {`
                    let value = self.rewriter.rewrite(value);
                    self.push(1, format!("const {} = {}", name, value));
                    self.copy_range(entry.body.clone(), entry.depth, 1);
                    self.close(&entry, "})");
                }
                None => self.unconverted(&entry, "method"),
            }
        }
    }

    fn transform_watch(&mut self, block: &Block) {
        for entry in lines::entries(self.lines, block.span.body.clone()) {
            let header = lines::header_text(self.lines, &entry);
            let header = header.trim();
            let Some(source) = lines::entry_key(header) else {
                self.review(&entry, "watch");
                continue;
            };
            self.uses.insert("watch".to_string());
            let accessor = self.watch_source(&source);

            if let Some(f) = FnHeader::parse(header) {
                self.push(
                    1,
                    format!("watch({}, {}({}) => {{", accessor, f.async_prefix(), f.params),
                );
                self.copy_range(entry.body.clone(), entry.depth, 1);
                self.push(1, "})");
                continue;
            }

            match split_member(header) {
                Some((_, "{")) => self.transform_watch_object(&entry, &accessor),
                Some((_, value)) if entry.is_single_line() => {
                    let value = strip_trailing_comma(value);
                    let handler = if is_string_literal(value) {
                        unquote(value).to_string()
                    } else {
                        self.rewriter.rewrite(value)
                    };
                    self.push(1, format!("watch({}, {})", accessor, handler));
                }
                _ => self.review(&entry, "watch"),
            }
        }
    }

    /// `source: { handler(val) {...}, immediate: true }`
    fn transform_watch_object(&mut self, entry: &Entry, accessor: &str) {
        let mut options = Vec::new();
        let mut handler: Option<(Entry, FnHeader)> = None;
        let mut handler_ref: Option<String> = None;

        for inner in lines::entries(self.lines, entry.body.clone()) {
            let header = lines::header_text(self.lines, &inner);
            let header = header.trim();

            if lines::entry_key(header).as_deref() == Some("handler") {
                if let Some(f) = FnHeader::parse(header) {
                    handler = Some((inner, f));
                } else if let Some((_, value)) = split_member(header) {
                    let value = strip_trailing_comma(value);
                    handler_ref = Some(if is_string_literal(value) {
                        unquote(value).to_string()
                    } else {
                        self.rewriter.rewrite(value)
                    });
                }
            } else if inner.is_single_line() {
                options.push(self.rewriter.rewrite(strip_trailing_comma(header)));
            }
        }

        let options = if options.is_empty() {
            String::new()
        } else {
            format!(", {{ {} }}", options.join(", "))
        };

        match (handler, handler_ref) {
            (Some((inner, f)), _) => {
                self.push(
                    1,
                    format!("watch({}, {}({}) => {{", accessor, f.async_prefix(), f.params),
                );
                self.copy_range(inner.body.clone(), inner.depth, 1);
                self.push(1, format!("}}{})", options));
            }
            (None, Some(handler)) => {
                self.push(1, format!("watch({}, {}{})", accessor, handler, options));
            }
            (None, None) => self.review(entry, "watch"),
        }
    }

    /// Watch source accessor. A computed handle is passed bare; a plain
    /// property path is wrapped in a getter.
    fn watch_source(&self, source: &str) -> String {
        let (head, path) = match source.split_once('.') {
            Some((head, path)) => (head, Some(path)),
            None => (source, None),
        };
        let target = self.namespace.resolve(head);

        match (self.namespace.kind_of(head), path) {
            (Some(SymbolKind::Computed), None) => head.to_string(),
            (_, Some(path)) => format!("() => {}.{}", target, path),
            (_, None) => format!("() => {}", target),
        }
    }

    fn transform_hook(&mut self, block: &Block, hook: Hook) {
        let header = lines::header_text(self.lines, &block.span);
        let header = header.trim();
        let parsed = FnHeader::parse(header);

        match (hook.registration(), parsed) {
            (Some(register), Some(f)) => {
                self.uses.insert(register.to_string());
                self.push(
                    1,
                    format!("{}({}({}) => {{", register, f.async_prefix(), f.params),
                );
                self.copy_range(block.span.body.clone(), block.depth(), 1);
                self.push(1, "})");
            }
            (Some(register), None) => match split_member(header) {
                Some((_, value)) if block.span.is_single_line() => {
                    self.uses.insert(register.to_string());
                    let value = self.rewriter.rewrite(strip_trailing_comma(value));
                    self.push(1, format!("{}({})", register, value));
                }
                _ => self.review(&block.span, "lifecycle hook"),
            },
            (None, Some(_)) => {
                // creation hooks run inline during setup
                let body = block.span.body.clone();
                if let Some(depth) = lines::depth_of(self.lines, body.clone()) {
                    self.copy_range(body, depth, 1);
                }
            }
            (None, None) => self.review(&block.span, "lifecycle hook"),
        }
    }

    /// Leave an unconvertible entry commented out for manual review
    pub fn review(&mut self, entry: &Entry, what: &str) {
        self.push(1, format!("// review: could not convert {} entry", what));
        let last = entry.close.unwrap_or(entry.body.end.max(entry.header_end + 1) - 1);
        for i in entry.header..=last {
            let line = self.lines[i];
            let extra = lines::indent_of(line).saturating_sub(entry.depth);
            self.push(1, format!("// {}{}", " ".repeat(extra), line.trim()));
        }
    }

    /// Review a computed or method entry; its name is no longer returned
    fn unconverted(&mut self, entry: &Entry, what: &str) {
        if let Some(key) = lines::entry_key(self.lines[entry.header]) {
            self.dropped.insert(key);
        }
        self.review(entry, what);
    }

    /// Emit an entry's closing line without the object-literal comma
    fn close(&mut self, entry: &Entry, fallback: &str) {
        let text = match entry.close {
            Some(close) => {
                let line = self.rewriter.rewrite(self.lines[close].trim());
                strip_trailing_comma(&line).to_string()
            }
            None => fallback.to_string(),
        };
        self.push(1, text);
    }

    fn push(&mut self, level: usize, text: impl AsRef<str>) {
        self.out
            .push(format!("{}{}", " ".repeat(level * self.unit), text.as_ref()));
    }

    /// Copy a source line, rewritten, keeping its indentation relative to
    /// column `from` and placing that column at `level`
    fn copy(&mut self, index: usize, from: usize, level: usize) {
        let line = self.lines[index];
        if lines::is_blank(line) {
            self.out.push(String::new());
            return;
        }
        let extra = lines::indent_of(line).saturating_sub(from);
        let text = self.rewriter.rewrite(line.trim());
        self.out
            .push(format!("{}{}", " ".repeat(level * self.unit + extra), text));
    }

    fn copy_range(&mut self, range: Range<usize>, from: usize, level: usize) {
        for i in range {
            self.copy(i, from, level);
        }
    }
}
