/// Reference rewriter: replaces `this.<ident>` with receiver-free expressions

use crate::transpiler::analyzer::Namespace;
use crate::transpiler::lexer::{self, Region};
use crate::transpiler::lines::is_ident_char;

pub struct Rewriter<'a> {
    namespace: &'a Namespace,
}

impl<'a> Rewriter<'a> {
    pub fn new(namespace: &'a Namespace) -> Self {
        Rewriter { namespace }
    }

    /// Rewrite every receiver reference in the code regions of a line.
    /// Strings and comments pass through; template substitutions are code.
    pub fn rewrite(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        for segment in lexer::segments(line) {
            match segment.region {
                Region::Code => out.push_str(&self.rewrite_code(segment.text)),
                Region::Str | Region::Comment => out.push_str(segment.text),
            }
        }
        out
    }

    fn rewrite_code(&self, code: &str) -> String {
        let bytes = code.as_bytes();
        let mut out = String::with_capacity(code.len());
        let mut copied = 0;
        let mut search = 0;

        while let Some(offset) = code[search..].find("this") {
            let at = search + offset;
            let dot = at + 4;
            search = dot;

            let standalone = at == 0 || {
                let prev = bytes[at - 1] as char;
                !is_ident_char(prev) && prev != '.'
            };
            if !standalone || bytes.get(dot) != Some(&b'.') {
                continue;
            }

            let ident_start = dot + 1;
            let ident_len = code[ident_start..]
                .find(|c: char| !is_ident_char(c))
                .unwrap_or(code.len() - ident_start);
            if ident_len == 0 {
                continue;
            }

            let ident_end = ident_start + ident_len;
            out.push_str(&code[copied..at]);
            out.push_str(&self.namespace.resolve(&code[ident_start..ident_end]));
            copied = ident_end;
            // resume after the replaced source text, never inside the replacement
            search = ident_end;
        }

        out.push_str(&code[copied..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpiler::analyzer::SymbolKind;

    fn namespace() -> Namespace {
        let mut ns = Namespace::new();
        ns.insert("count", SymbolKind::State);
        ns.insert("double", SymbolKind::Computed);
        ns.insert("size", SymbolKind::Prop);
        ns.insert("inc", SymbolKind::Method);
        ns
    }

    fn rewrite(line: &str) -> String {
        let ns = namespace();
        Rewriter::new(&ns).rewrite(line)
    }

    #[test]
    fn test_rewrites_every_occurrence() {
        assert_eq!(
            rewrite("this.count = this.double + this.size"),
            "data.count = double.value + props.size"
        );
    }

    #[test]
    fn test_method_calls_are_unqualified() {
        assert_eq!(rewrite("this.inc()"), "inc()");
    }

    #[test]
    fn test_ambient_properties_use_context() {
        assert_eq!(rewrite("this.$emit('change', this.count)"), "context.emit('change', data.count)");
        assert_eq!(rewrite("this.$refs.input.focus()"), "context.refs.input.focus()");
    }

    #[test]
    fn test_unknown_identifier_defaults_to_prop() {
        assert_eq!(rewrite("return this.color"), "return props.color");
    }

    #[test]
    fn test_strings_and_comments_untouched() {
        assert_eq!(
            rewrite("log('this.count') // this.count"),
            "log('this.count') // this.count"
        );
    }

    #[test]
    fn test_template_substitution_rewritten() {
        assert_eq!(rewrite("`n=${this.count}`"), "`n=${data.count}`");
    }

    #[test]
    fn test_identifier_boundaries() {
        assert_eq!(rewrite("athis.count"), "athis.count");
        assert_eq!(rewrite("vm.this.count"), "vm.this.count");
        assert_eq!(rewrite("this.countdown"), "props.countdown");
        assert_eq!(rewrite("const self = this"), "const self = this");
    }

    #[test]
    fn test_replacement_is_not_rescanned() {
        let mut ns = Namespace::new();
        ns.insert("this", SymbolKind::State);
        let out = Rewriter::new(&ns).rewrite("this.this.this");
        assert_eq!(out, "data.this.this");
    }
}
