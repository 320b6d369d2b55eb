//! Diagnostic system for ByteLang compilation errors.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Notes and suggestions (how to fix)
//!
//! Stages that can find several independent problems gather them with an
//! [`Accumulator`] and return `Result<T, Vec<Diagnostic>>`.

mod accumulator;
pub mod emitter;

pub use accumulator::{Accumulator, Outcome};

use bytelang_ir::{RegistryError, Span};
use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit is the phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Syntax errors
/// - E2xxx: Semantic errors
/// - E3xxx: Catalog errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // ===== Lexer Errors (E0xxx) =====
    /// Unrecognized character
    E0001,
    /// Invalid number literal
    E0002,

    // ===== Syntax Errors (E1xxx) =====
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Expected type
    E1005,
    /// Unknown directive
    E1006,
    /// Missing statement terminator
    E1007,
    /// Misplaced token at statement start
    E1008,

    // ===== Semantic Errors (E2xxx) =====
    /// Duplicate identifier
    E2001,
    /// Undefined identifier
    E2002,
    /// Argument count mismatch
    E2003,
    /// Operator not supported for value kind
    E2004,
    /// Division by zero
    E2005,
    /// Arithmetic overflow
    E2006,
    /// Initializer count mismatch
    E2007,
    /// Missing precondition
    E2008,
    /// Macro recursion limit reached
    E2009,
    /// Value out of range for type
    E2010,
    /// Invalid array length
    E2011,

    // ===== Catalog Errors (E3xxx) =====
    /// Unit source not found or unreadable
    E3001,
    /// Dependency unit failed to compile
    E3002,

    // ===== Internal Errors (E9xxx) =====
    /// Internal compiler error
    E9001,
}

impl ErrorCode {
    /// Get the code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            // Syntax
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            // Semantic
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            // Catalog
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            // Internal
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Taxonomy bucket this code belongs to.
    pub fn category(&self) -> &'static str {
        match self {
            ErrorCode::E0001 | ErrorCode::E0002 => "LexError",
            ErrorCode::E1001
            | ErrorCode::E1002
            | ErrorCode::E1003
            | ErrorCode::E1004
            | ErrorCode::E1005
            | ErrorCode::E1006
            | ErrorCode::E1007
            | ErrorCode::E1008 => "SyntaxError",
            ErrorCode::E2001 => "DuplicateIdentifier",
            ErrorCode::E2002 => "UndefinedIdentifier",
            ErrorCode::E2003 => "ArityMismatch",
            ErrorCode::E2004 | ErrorCode::E2005 | ErrorCode::E2006 => "OperatorError",
            ErrorCode::E2007 => "CountMismatch",
            ErrorCode::E2008 => "MissingPrecondition",
            ErrorCode::E2009 => "MacroRecursion",
            ErrorCode::E2010 => "ValueOutOfRange",
            ErrorCode::E2011 => "InvalidLength",
            ErrorCode::E3001 | ErrorCode::E3002 => "CatalogError",
            ErrorCode::E9001 => "InternalError",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the main error location).
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related context).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A diagnostic with the context needed for a useful error message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Main error message.
    pub message: String,
    /// Labeled spans showing where the error occurred.
    pub labels: Vec<Label>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
    /// Human-readable fixes.
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label at the error location.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label for context.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Get the primary span (first primary label's span).
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    /// Locate a diagnostic that was built without a source position.
    ///
    /// Labels at [`Span::DUMMY`] move to `span`; if no primary label remains
    /// one is added there.
    pub fn anchored(mut self, span: Span) -> Self {
        for label in &mut self.labels {
            if label.span == Span::DUMMY {
                label.span = span;
            }
        }
        if !self.labels.iter().any(|label| label.is_primary) {
            self.labels.push(Label::primary(span, "here"));
        }
        self
    }
}

// ===== Diagnostic Helpers =====

/// "unexpected token: expected X, found Y"
pub fn unexpected_token(span: Span, expected: &str, found: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(format!("unexpected token: expected {expected}, found {found}"))
        .with_label(span, format!("expected {expected}"))
}

pub fn expected_expression(span: Span, found: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1002)
        .with_message(format!("expected expression, found {found}"))
        .with_label(span, "expected expression here")
}

/// Closing bracket missing; points at where it was expected and at the opener.
pub fn unclosed_delimiter(open_span: Span, close_span: Span, delimiter: char) -> Diagnostic {
    let expected = match delimiter {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        _ => delimiter,
    };
    Diagnostic::error(ErrorCode::E1003)
        .with_message(format!("unclosed delimiter `{delimiter}`"))
        .with_label(close_span, format!("expected `{expected}`"))
        .with_secondary_label(open_span, "unclosed delimiter opened here")
}

/// Second definition of a name within one scope.
pub fn duplicate_identifier(span: Span, kind: &str, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message(format!("{kind} `{name}` is already defined"))
        .with_label(span, format!("duplicate {kind}"))
}

pub fn undefined_identifier(span: Span, kind: &str, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2002)
        .with_message(format!("{kind} `{name}` not found"))
        .with_label(span, format!("unknown {kind}"))
}

/// Wrong number of arguments for a macro or an instruction.
pub fn arity_mismatch(span: Span, what: &str, expected: usize, found: usize) -> Diagnostic {
    let s = if expected == 1 { "" } else { "s" };
    Diagnostic::error(ErrorCode::E2003)
        .with_message(format!(
            "{what} takes {expected} argument{s} but {found} were supplied"
        ))
        .with_label(span, format!("expected {expected} argument{s}"))
}

/// Initializer list length differs from the array length or struct field count.
pub fn count_mismatch(span: Span, expected: usize, found: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2007)
        .with_message(format!(
            "initializer count mismatch. Expected: {expected}, got {found}"
        ))
        .with_label(span, format!("expected {expected} items"))
}

pub fn missing_precondition(span: Span, message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2008)
        .with_message(message)
        .with_label(span, "required setting is missing")
}

/// Convert a registry failure into a diagnostic at `span`.
pub fn from_registry_error(span: Span, error: &RegistryError) -> Diagnostic {
    match error {
        RegistryError::NotFound { kind, key } => undefined_identifier(span, kind, key),
        RegistryError::Duplicate { kind, key } => duplicate_identifier(span, kind, key),
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error [{}]: {}", self.code, self.message)?;

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {} {:?}: {}", marker, label.span, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E1001.to_string(), "E1001");
        assert_eq!(ErrorCode::E2001.as_str(), "E2001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::E0001.category(), "LexError");
        assert_eq!(ErrorCode::E1007.category(), "SyntaxError");
        assert_eq!(ErrorCode::E2001.category(), "DuplicateIdentifier");
        assert_eq!(ErrorCode::E2005.category(), "OperatorError");
        assert_eq!(ErrorCode::E2008.category(), "MissingPrecondition");
        assert_eq!(ErrorCode::E3002.category(), "CatalogError");
    }

    #[test]
    fn test_diagnostic_builder() {
        let diag = Diagnostic::error(ErrorCode::E1001)
            .with_message("test error")
            .with_label(Span::new(0, 5), "here")
            .with_note("some context")
            .with_suggestion("try this");

        assert_eq!(diag.code, ErrorCode::E1001);
        assert_eq!(diag.message, "test error");
        assert_eq!(diag.labels.len(), 1);
        assert!(diag.labels[0].is_primary);
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.suggestions.len(), 1);
    }

    #[test]
    fn test_anchored() {
        let moved = count_mismatch(Span::DUMMY, 2, 1).anchored(Span::new(4, 9));
        assert_eq!(moved.primary_span(), Some(Span::new(4, 9)));
        assert_eq!(moved.labels.len(), 1);

        let added = Diagnostic::error(ErrorCode::E2010).anchored(Span::new(1, 2));
        assert_eq!(added.primary_span(), Some(Span::new(1, 2)));

        let kept = Diagnostic::error(ErrorCode::E2010)
            .with_label(Span::new(0, 1), "x")
            .anchored(Span::new(5, 6));
        assert_eq!(kept.primary_span(), Some(Span::new(0, 1)));
    }

    #[test]
    fn test_unclosed_delimiter() {
        let diag = unclosed_delimiter(Span::new(0, 1), Span::new(10, 10), '{');

        assert_eq!(diag.code, ErrorCode::E1003);
        assert_eq!(diag.labels.len(), 2);
        assert!(diag.labels[0].is_primary);
        assert!(!diag.labels[1].is_primary);
        assert_eq!(diag.labels[0].message, "expected `}`");
    }

    #[test]
    fn test_count_mismatch_reports_both_counts() {
        let diag = count_mismatch(Span::new(3, 9), 4, 2);
        assert_eq!(diag.code, ErrorCode::E2007);
        assert!(diag.message.contains("Expected: 4"));
        assert!(diag.message.contains("got 2"));
    }

    #[test]
    fn test_arity_mismatch_plural() {
        let one = arity_mismatch(Span::DUMMY, "macro `inc`", 1, 2);
        assert!(one.message.contains("1 argument but"));
        let two = arity_mismatch(Span::DUMMY, "macro `add`", 2, 1);
        assert!(two.message.contains("2 arguments"));
    }

    #[test]
    fn test_from_registry_error() {
        let err = RegistryError::NotFound {
            kind: "macro",
            key: "add".into(),
        };
        let diag = from_registry_error(Span::new(1, 4), &err);
        assert_eq!(diag.code, ErrorCode::E2002);
        assert_eq!(diag.message, "macro `add` not found");
        assert_eq!(diag.primary_span(), Some(Span::new(1, 4)));

        let dup = RegistryError::Duplicate {
            kind: "constant",
            key: "x".into(),
        };
        assert_eq!(from_registry_error(Span::DUMMY, &dup).code, ErrorCode::E2001);
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(ErrorCode::E2005)
            .with_message("division by zero")
            .with_label(Span::new(0, 5), "divisor is zero")
            .with_note("true division always yields a float");

        assert_eq!(
            diag.to_string(),
            "error [E2005]: division by zero\n  --> 0..5: divisor is zero\n  = note: true division always yields a float"
        );
    }
}
