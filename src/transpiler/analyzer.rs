/// Pretransform pass: builds the per-file Namespace
///
/// Each section kind is scanned once, read-only, before any rewriting:
/// - state keys become `data.<key>`
/// - computed declarations become `<name>.value` and are exported
/// - props become `props.<name>` and are never exported
/// - methods keep their own name and are exported

use std::collections::HashMap;

use crate::transpiler::ast::{Block, OptionsObject, SectionKind};
use crate::transpiler::lines;

/// Receiver-free expression an identifier is rewritten to
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    State,
    Computed,
    Prop,
    Method,
}

/// Flat identifier table for one file. No scoping: the first declaration
/// of a name wins.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    symbols: HashMap<String, Symbol>,
    exports: Vec<String>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the name was already declared
    pub fn insert(&mut self, name: &str, kind: SymbolKind) -> bool {
        if self.symbols.contains_key(name) {
            return false;
        }

        let target = match kind {
            SymbolKind::State => format!("data.{}", name),
            SymbolKind::Computed => format!("{}.value", name),
            SymbolKind::Prop => format!("props.{}", name),
            SymbolKind::Method => name.to_string(),
        };

        self.symbols.insert(
            name.to_string(),
            Symbol {
                kind,
                target,
            },
        );

        if matches!(kind, SymbolKind::Computed | SymbolKind::Method) {
            self.exports.push(name.to_string());
        }
        true
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<SymbolKind> {
        self.get(name).map(|sym| sym.kind)
    }

    /// Identifiers returned from the composable, in declaration order
    pub fn exports(&self) -> &[String] {
        &self.exports
    }

    /// Expression replacing `this.<ident>`.
    ///
    /// Unknown `$`-prefixed names are framework instance properties and go
    /// through `context`; any other unknown name is assumed to be a prop.
    pub fn resolve(&self, ident: &str) -> String {
        if let Some(symbol) = self.get(ident) {
            return symbol.target.clone();
        }
        match ident.strip_prefix('$') {
            Some(rest) => format!("context.{}", rest),
            None => format!("props.{}", ident),
        }
    }
}

pub struct Analyzer<'a> {
    lines: &'a [&'a str],
    namespace: Namespace,
}

impl<'a> Analyzer<'a> {
    pub fn new(lines: &'a [&'a str]) -> Self {
        Analyzer {
            lines,
            namespace: Namespace::new(),
        }
    }

    /// Build the Namespace for a file. A file without an options object
    /// yields an empty Namespace.
    pub fn analyze(lines: &'a [&'a str]) -> Namespace {
        match lines::find_sections(lines) {
            Some(options) => Self::analyze_options(lines, &options),
            None => Namespace::new(),
        }
    }

    pub fn analyze_options(lines: &'a [&'a str], options: &OptionsObject) -> Namespace {
        let mut analyzer = Analyzer::new(lines);

        for block in options.blocks_of(SectionKind::State) {
            analyzer.collect_state(block);
        }
        for block in options.blocks_of(SectionKind::Computed) {
            analyzer.collect_computed(block);
        }
        for block in options.blocks_of(SectionKind::Props) {
            analyzer.collect_props(block);
        }
        for block in options.blocks_of(SectionKind::Methods) {
            analyzer.collect_methods(block);
        }

        analyzer.namespace
    }

    fn collect_state(&mut self, block: &Block) {
        let (_, state) = lines::state_ranges(self.lines, block);
        for entry in lines::entries(self.lines, state) {
            if let Some(key) = lines::entry_key(self.lines[entry.header]) {
                self.namespace.insert(&key, SymbolKind::State);
            }
        }
    }

    fn collect_computed(&mut self, block: &Block) {
        for entry in lines::entries(self.lines, block.span.body.clone()) {
            if let Some(name) = lines::entry_key(self.lines[entry.header]) {
                self.namespace.insert(&name, SymbolKind::Computed);
            }
        }
    }

    fn collect_props(&mut self, block: &Block) {
        if block.span.is_single_line() {
            // props: ['a', 'b']
            for name in quoted_names(self.lines[block.header()]) {
                self.namespace.insert(&name, SymbolKind::Prop);
            }
            return;
        }

        for entry in lines::entries(self.lines, block.span.body.clone()) {
            if let Some(name) = lines::entry_key(self.lines[entry.header]) {
                self.namespace.insert(&name, SymbolKind::Prop);
            }
        }
    }

    fn collect_methods(&mut self, block: &Block) {
        for entry in lines::entries(self.lines, block.span.body.clone()) {
            if let Some(name) = lines::entry_key(self.lines[entry.header]) {
                self.namespace.insert(&name, SymbolKind::Method);
            }
        }
    }
}

/// Quoted strings in the array part of a line: `props: ['a', "b"]` → [a, b]
pub fn quoted_names(line: &str) -> Vec<String> {
    let Some(open) = line.find('[') else {
        return Vec::new();
    };

    let mut names = Vec::new();
    let mut rest = &line[open + 1..];
    while let Some(start) = rest.find(['\'', '"']) {
        let quote = rest[start..].chars().next().unwrap_or('\'');
        let after = &rest[start + 1..];
        let Some(end) = after.find(quote) else {
            break;
        };
        names.push(after[..end].to_string());
        rest = &after[end + 1..];
    }
    names
}
