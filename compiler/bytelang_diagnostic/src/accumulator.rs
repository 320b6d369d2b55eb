//! Error accumulation across independent sub-results.
//!
//! ```text
//! let mut acc = Accumulator::new();
//! let name = acc.take(parse_name(p));
//! let fields = acc.take(parse_fields(p));
//! match (name, fields) {
//!     (Some(name), Some(fields)) => acc.finish(Struct { name, fields }),
//!     _ => acc.fail(),
//! }
//! ```

use crate::{Diagnostic, ErrorCode};

/// A value, or a non-empty ordered list of diagnostics.
pub type Outcome<T> = Result<T, Vec<Diagnostic>>;

/// Collects diagnostics from sub-results so a stage can report every local
/// problem at once.
#[derive(Clone, Debug, Default)]
pub struct Accumulator {
    diagnostics: Vec<Diagnostic>,
}

impl Accumulator {
    pub fn new() -> Self {
        Accumulator::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Keep the value of a successful result, record the errors of a failed one.
    pub fn take<T>(&mut self, result: Outcome<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(diagnostics) => {
                self.diagnostics.extend(diagnostics);
                None
            }
        }
    }

    /// [`take`](Self::take) for single-diagnostic results.
    pub fn take_one<T>(&mut self, result: Result<T, Diagnostic>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(diagnostic) => {
                self.diagnostics.push(diagnostic);
                None
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// `Ok(value)` if nothing was recorded, otherwise every recorded error.
    pub fn finish<T>(self, value: T) -> Outcome<T> {
        if self.has_errors() {
            Err(self.diagnostics)
        } else {
            Ok(value)
        }
    }

    /// Like [`finish`](Self::finish) but only builds the value on success.
    pub fn finish_with<T>(self, build: impl FnOnce() -> T) -> Outcome<T> {
        if self.has_errors() {
            Err(self.diagnostics)
        } else {
            Ok(build())
        }
    }

    /// Fail with everything recorded.
    ///
    /// The error list is never empty: failing with nothing recorded yields
    /// an internal error.
    pub fn fail<T>(mut self) -> Outcome<T> {
        if self.diagnostics.is_empty() {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E9001)
                    .with_message("internal error: stage failed without reporting a diagnostic"),
            );
        }
        Err(self.diagnostics)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytelang_ir::Span;
    use pretty_assertions::assert_eq;

    fn err(code: ErrorCode, message: &str) -> Diagnostic {
        Diagnostic::error(code)
            .with_message(message)
            .with_label(Span::DUMMY, "")
    }

    #[test]
    fn test_take_keeps_order() {
        let mut acc = Accumulator::new();
        let a: Option<i32> = acc.take(Err(vec![err(ErrorCode::E1001, "first")]));
        let b = acc.take(Ok(2));
        let c: Option<i32> = acc.take_one(Err(err(ErrorCode::E1002, "second")));
        assert_eq!(a, None);
        assert_eq!(b, Some(2));
        assert_eq!(c, None);

        let messages: Vec<_> = acc
            .into_diagnostics()
            .into_iter()
            .map(|d| d.message)
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_finish_ok_when_empty() {
        let acc = Accumulator::new();
        assert_eq!(acc.finish(5), Ok(5));
    }

    #[test]
    fn test_finish_err_when_recorded() {
        let mut acc = Accumulator::new();
        acc.push(err(ErrorCode::E2001, "dup"));
        let result = acc.finish_with(|| 5);
        assert_eq!(result.unwrap_err().len(), 1);
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let mut acc = Accumulator::new();
        acc.push(Diagnostic::warning(ErrorCode::E9001));
        assert!(!acc.has_errors());
        assert_eq!(acc.finish(()), Ok(()));
    }

    #[test]
    fn test_fail_is_never_empty() {
        let acc = Accumulator::new();
        let result: Outcome<()> = acc.fail();
        let diagnostics = result.unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::E9001);
    }
}
