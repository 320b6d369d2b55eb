//! Debug commands: `lex` and `parse` for inspecting the front end.

use std::fmt::{Display, Write as _};

use bytelang_diagnostic::Outcome;
use bytelang_ir::{Program, TokenList};
use bytelang_lexer::tokenize;
use bytelang_parse::{parse_common, parse_environment, parse_package, parse_sketch};

use super::{read_file, Failure, UnitKind};

/// Tokenize a file and list the token stream.
pub fn lex_file(path: &str) -> Result<String, Failure> {
    let source = read_file(path)?;
    let tokens = tokenize(&source).map_err(|errors| Failure::new(path, Some(source.clone()), errors))?;

    let mut out = format!("Tokens for '{path}' ({} tokens):\n", tokens.len());
    for token in tokens.iter() {
        let _ = writeln!(out, "  {:?} @ {}", token.kind, token.span);
    }
    Ok(out)
}

/// Parse a file with the grammar of `unit` and list its statements.
pub fn parse_file(path: &str, unit: UnitKind) -> Result<String, Failure> {
    let source = read_file(path)?;
    let fail = |errors| Failure::new(path, Some(source.clone()), errors);
    let tokens = tokenize(&source).map_err(fail)?;
    let statements = parse_as(&tokens, unit).map_err(fail)?;

    let mut out = format!(
        "Parse result for '{path}' ({unit:?} unit):\n  Statements: {}\n",
        statements.len()
    );
    for statement in &statements {
        let _ = writeln!(out, "  {statement}");
    }
    Ok(out)
}

fn parse_as(tokens: &TokenList, unit: UnitKind) -> Outcome<Vec<String>> {
    match unit {
        UnitKind::Common => parse_common(tokens).map(lines),
        UnitKind::Package => parse_package(tokens).map(lines),
        UnitKind::Environment => parse_environment(tokens).map(lines),
        UnitKind::Sketch => parse_sketch(tokens).map(lines),
    }
}

fn lines<S: Display>(program: Program<S>) -> Vec<String> {
    program.statements.iter().map(ToString::to_string).collect()
}
