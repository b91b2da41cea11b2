//! Tokenize, parse, and validate RQL expressions

use super::CliError;
use crate::{
    ColumnValidator, FunctionRegistry, Parser, TermTree, Token, Tokenizer, ValidationError, output,
};

/// How results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One canonical term or token per line
    #[default]
    Text,
    Json,
    PrettyJson,
}

impl OutputFormat {
    pub fn from_flags(json: bool, pretty: bool) -> Self {
        match (json, pretty) {
            (_, true) => OutputFormat::PrettyJson,
            (true, false) => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }

    pub(crate) fn render(self, value: &serde_json::Value) -> String {
        match self {
            OutputFormat::PrettyJson => output::to_json_pretty(value),
            _ => output::to_json(value),
        }
    }
}

/// Options for the parse and check commands
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The RQL expression
    pub expr: String,
    /// Accept `a=b` and `a=op=b` operator forms
    pub operator: bool,
    pub format: OutputFormat,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Parsed and every column reference is acceptable
    Valid(String),
    /// Parsed, but some column references were rejected
    Invalid(Vec<ValidationError>),
}

fn parse(options: &CheckOptions) -> Result<TermTree, CliError> {
    let parser = Parser::new(Tokenizer::new(&options.expr));
    let tree = if options.operator {
        parser.parse_clause()?
    } else {
        parser.parse()?
    };
    Ok(tree)
}

fn render_tree(tree: &TermTree, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => tree
            .roots()
            .iter()
            .map(|&id| tree.get(id).to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => format.render(&output::tree_to_json(tree)),
    }
}

/// Tokenize an expression and render the tokens
pub fn execute_tokenize(expr: &str, format: OutputFormat) -> Result<String, CliError> {
    let tokens: Vec<Token> = Tokenizer::new(expr).collect::<Result<_, _>>()?;
    Ok(match format {
        OutputFormat::Text => tokens.into_iter().map(|t| t.text).collect::<Vec<_>>().join("\n"),
        _ => format.render(&output::tokens_to_json(&tokens)),
    })
}

/// Parse an expression and render its term tree
pub fn execute_parse(options: &CheckOptions) -> Result<String, CliError> {
    let tree = parse(options)?;
    Ok(render_tree(&tree, options.format))
}

/// Parse an expression and validate its column references
pub fn execute_check(options: &CheckOptions, registry: &FunctionRegistry) -> Result<CheckResult, CliError> {
    let tree = parse(options)?;
    let errors = ColumnValidator::new(registry).invalid_columns(&tree);
    if errors.is_empty() {
        Ok(CheckResult::Valid(render_tree(&tree, options.format)))
    } else {
        Ok(CheckResult::Invalid(errors))
    }
}
