/// Options-object to composable-function source rewriter
pub mod analyzer;
pub mod ast;
pub mod codegen;
pub mod lexer;
pub mod lines;
pub mod rewriter;

use crate::transpiler::analyzer::Analyzer;
use crate::transpiler::codegen::CodeGenerator;

/// Settings for the generated module
#[derive(Debug, Clone, PartialEq)]
pub struct TranspileOptions {
    /// Module the reactive primitives are imported from
    pub framework: String,
    /// Spaces per indentation level in the output
    pub indent: usize,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        TranspileOptions {
            framework: "vue".to_string(),
            indent: 2,
        }
    }
}

/// Rewrite one component source file into composable style
pub fn transpile(source: &str, component_name: &str) -> Result<String, String> {
    transpile_with(source, component_name, &TranspileOptions::default())
}

pub fn transpile_with(
    source: &str,
    component_name: &str,
    options: &TranspileOptions,
) -> Result<String, String> {
    let lines: Vec<&str> = source.lines().collect();

    // Pretransform pass: read-only scan building the symbol table
    let namespace = Analyzer::analyze(&lines);

    // Transform pass over the same lines, driven by the namespace
    let generator = CodeGenerator::new(component_name, &options.framework, options.indent);
    generator.generate(&lines, &namespace)
}
