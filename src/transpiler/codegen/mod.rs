/// Assembler for the composable-style module
///
/// Output order is fixed: framework import, carried-over preamble, props
/// configuration object, composable function, registration block, and
/// whatever followed the options object in the source.
pub mod blocks;

use std::collections::BTreeSet;

use crate::transpiler::analyzer::Namespace;
use crate::transpiler::ast::{Block, SectionKind};
use crate::transpiler::codegen::blocks::{split_member, strip_trailing_comma, unquote, BlockTransformer, Generated};
use crate::transpiler::lexer;
use crate::transpiler::lines;

pub struct CodeGenerator {
    component_name: String,
    framework: String,
    unit: usize,
}

/// Everything collected from the options object before assembly
#[derive(Default)]
struct Parts {
    imports: BTreeSet<String>,
    preamble: Vec<String>,
    props: Option<Vec<String>>,
    mixins: Vec<String>,
    passthrough: Vec<String>,
}

impl CodeGenerator {
    pub fn new(component_name: &str, framework: &str, indent: usize) -> Self {
        CodeGenerator {
            component_name: pascal_case(component_name),
            framework: framework.to_string(),
            unit: indent.max(1),
        }
    }

    /// `use<Name>`
    pub fn composable_name(&self) -> String {
        format!("use{}", self.component_name)
    }

    /// `<name>Props`
    pub fn props_name(&self) -> String {
        format!("{}Props", camel_case(&self.component_name))
    }

    /// Transform pass: walk the source lines again, now rewriting blocks,
    /// and assemble the module.
    pub fn generate(&self, lines: &[&str], namespace: &Namespace) -> Result<String, String> {
        let options = lines::find_sections(lines).ok_or_else(|| {
            "no component options object found (expected `export default {` or `defineComponent({`)"
                .to_string()
        })?;

        let mut parts = Parts::default();
        parts.imports.insert("defineComponent".to_string());
        for line in &lines[..options.head] {
            match self.framework_import(line) {
                Some(names) => parts.imports.extend(names),
                None => parts.preamble.push(line.to_string()),
            }
        }

        parts.mixins = header_mixins(&lines[options.head..=options.start]);

        let mut transformer = Some(BlockTransformer::new(lines, namespace, self.unit));
        let mut module = Vec::new();
        let mut trailer = Vec::new();
        let mut emitted = false;

        let mut i = options.start + 1;
        while i < lines.len() {
            let line = lines[i];

            if emitted {
                trailer.push(line.to_string());
                i += 1;
                continue;
            }

            if let Some(block) = options.block_at(i) {
                match block.kind {
                    SectionKind::Props => parts.props = Some(self.props_config(lines, block)),
                    SectionKind::Mixins => parts.mixins.extend(mixin_names(lines, block)),
                    SectionKind::Passthrough => {
                        let carried = self.passthrough(lines, block);
                        parts.passthrough.extend(carried);
                    }
                    _ => {
                        if let Some(transformer) = transformer.as_mut() {
                            transformer.separate();
                            transformer.transform(block);
                        }
                    }
                }
                i = block.span.next_line().max(i + 1);
                continue;
            }

            if let Some(entry) = options.stray_at(i) {
                if let Some(transformer) = transformer.as_mut() {
                    transformer.separate();
                    transformer.review(entry, "option");
                }
                i = entry.next_line().max(i + 1);
                continue;
            }

            if lines::indent_of(line) == 0 && lines::is_closing(line) {
                // the options object ends here; later closings belong to the trailer
                if let Some(transformer) = transformer.take() {
                    module = self.assemble(&mut parts, transformer.finish(), namespace);
                }
                emitted = true;
            } else if lexer::is_comment_only(line) {
                if let Some(transformer) = transformer.as_mut() {
                    transformer.comment(line);
                }
            }
            i += 1;
        }

        if let Some(transformer) = transformer.take() {
            // unterminated options object
            module = self.assemble(&mut parts, transformer.finish(), namespace);
        }

        while trailer.last().is_some_and(|line| lines::is_blank(line)) {
            trailer.pop();
        }
        if trailer.iter().any(|line| !lines::is_blank(line)) {
            module.extend(trailer);
        }

        let mut output = module.join("\n");
        output.push('\n');
        Ok(output)
    }

    fn assemble(&self, parts: &mut Parts, generated: Generated, namespace: &Namespace) -> Vec<String> {
        let Generated {
            mut body,
            uses,
            dropped,
        } = generated;
        parts.imports.extend(uses);

        let one = self.indent(1);
        let two = self.indent(2);
        let composable = self.composable_name();
        let props_name = self.props_name();
        let mut out = Vec::new();

        let imports: Vec<&str> = parts.imports.iter().map(String::as_str).collect();
        out.push(format!("import {{ {} }} from '{}'", imports.join(", "), self.framework));

        let preamble = trim_blank_lines(&parts.preamble);
        if !preamble.is_empty() {
            out.push(String::new());
            out.extend(preamble.iter().cloned());
        }

        out.push(String::new());
        match parts.props.take() {
            Some(config) => out.extend(config),
            None => out.push(format!("export const {} = {{}}", props_name)),
        }

        out.push(String::new());
        out.push(format!("export const {} = (props, context) => {{", composable));
        for mixin in &parts.mixins {
            out.push(format!(
                "{}const {} = use{}(props, context)",
                one,
                camel_case(mixin),
                pascal_case(mixin)
            ));
        }
        while body.last().is_some_and(|line| line.is_empty()) {
            body.pop();
        }
        if !parts.mixins.is_empty() && !body.is_empty() {
            out.push(String::new());
        }
        if !body.is_empty() || !parts.mixins.is_empty() {
            out.extend(body);
            out.push(String::new());
        }
        out.push(format!("{}return {{", one));
        for mixin in &parts.mixins {
            out.push(format!("{}...{},", two, camel_case(mixin)));
        }
        for name in namespace.exports().iter().filter(|name| !dropped.contains(*name)) {
            out.push(format!("{}{},", two, name));
        }
        out.push(format!("{}}}", one));
        out.push("}".to_string());

        out.push(String::new());
        out.push("export default defineComponent({".to_string());
        out.append(&mut parts.passthrough);
        out.push(format!("{}props: {},", one, props_name));
        out.push(format!("{}setup(props, context) {{", one));
        out.push(format!("{}const {{}} = {}(props, context)", two, composable));
        out.push(format!("{}return {{}}", two));
        out.push(format!("{}}},", one));
        out.push("})".to_string());
        out
    }

    /// Named imports of `import ... from '<framework>'`, or `None` for any
    /// other line. The legacy default import is dropped.
    fn framework_import(&self, line: &str) -> Option<Vec<String>> {
        let code = lexer::strip_comments(line);
        let code = code.trim().trim_end_matches(';');
        let clause = code.strip_prefix("import ")?;
        let (clause, module) = clause.rsplit_once(" from ")?;
        if unquote(module) != self.framework {
            return None;
        }

        let names = match (clause.find('{'), clause.rfind('}')) {
            (Some(open), Some(close)) if open < close => clause[open + 1..close]
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        Some(names)
    }

    /// `export const <name>Props = ...` holding the props section verbatim
    fn props_config(&self, lines: &[&str], block: &Block) -> Vec<String> {
        let header = lines::header_text(lines, &block.span);
        let value = split_member(&header)
            .map(|(_, value)| value.to_string())
            .unwrap_or_else(|| "{".to_string());
        let declaration = format!("export const {} = ", self.props_name());

        if block.span.is_single_line() {
            return vec![format!("{}{}", declaration, strip_trailing_comma(&value))];
        }

        let mut out = vec![format!("{}{}", declaration, value)];
        let body = block.span.body.clone();
        let depth = lines::depth_of(lines, body.clone()).unwrap_or(block.depth());
        for line in &lines[body] {
            out.push(self.relative(line, depth, 1));
        }
        let close = match block.span.close {
            Some(close) => strip_trailing_comma(lines[close].trim()).to_string(),
            None if value.ends_with('[') => "]".to_string(),
            None => "}".to_string(),
        };
        out.push(close);
        out
    }

    /// Options the rewriter does not transform, carried into the
    /// registration object unchanged
    fn passthrough(&self, lines: &[&str], block: &Block) -> Vec<String> {
        let last = block
            .span
            .close
            .unwrap_or(block.span.body.end.max(block.span.header_end + 1) - 1);
        let mut out: Vec<String> = lines[block.header()..=last]
            .iter()
            .map(|line| self.relative(line, block.depth(), 1))
            .collect();

        if let Some(last) = out.last_mut() {
            let code = lexer::strip_comments(last);
            if !code.ends_with(',') && !code.ends_with(['{', '(', '[']) {
                last.insert(code.len(), ',');
            }
        }
        out
    }

    /// A source line re-indented so column `from` lands at `level`
    fn relative(&self, line: &str, from: usize, level: usize) -> String {
        if lines::is_blank(line) {
            return String::new();
        }
        let extra = lines::indent_of(line).saturating_sub(from);
        format!("{}{}{}", self.indent(level), " ".repeat(extra), line.trim())
    }

    fn indent(&self, level: usize) -> String {
        " ".repeat(level * self.unit)
    }
}

/// `mixins: [A, B]` (single or multi-line) → [A, B]
fn mixin_names(lines: &[&str], block: &Block) -> Vec<String> {
    let header = lines::header_text(lines, &block.span);
    if block.span.is_single_line() {
        let Some((_, value)) = split_member(&header) else {
            return Vec::new();
        };
        let inner = value.trim_end_matches(',').trim();
        let inner = inner
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(inner);
        return inner
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
    }

    lines[block.span.body.clone()]
        .iter()
        .filter(|line| !lines::is_blank(line) && !lexer::is_comment_only(line))
        .map(|line| strip_trailing_comma(lexer::strip_comments(line).trim()).to_string())
        .collect()
}

/// Mixins given in the options header, single or multi-line:
/// `export default mixins(Colorable, Toggleable).extend({` → [Colorable, Toggleable]
fn header_mixins(header: &[&str]) -> Vec<String> {
    let text: Vec<String> = header
        .iter()
        .map(|line| lexer::strip_comments(line).trim().to_string())
        .collect();
    let text = text.join(" ");

    let Some(at) = text.find("mixins(") else {
        return Vec::new();
    };
    if text[..at].chars().next_back().is_some_and(lines::is_ident_char) {
        return Vec::new();
    }

    let args = &text[at + "mixins(".len()..];
    let mut depth = 0usize;
    let mut end = args.len();
    for (i, c) in args.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => {
                end = i;
                break;
            }
            ')' => depth -= 1,
            _ => {}
        }
    }

    args[..end]
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn trim_blank_lines(lines: &[String]) -> &[String] {
    let start = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(start, |i| i + 1);
    &lines[start..end]
}

/// `date-picker` → `DatePicker`, `vsButton` → `VsButton`
pub fn pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric() && c != '$')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `DatePicker` → `datePicker`
pub fn camel_case(name: &str) -> String {
    let pascal = pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
