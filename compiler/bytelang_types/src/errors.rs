//! Operator and packing failures.
//!
//! Both are plain values without a location; callers attach the span of the
//! expression or statement when turning them into diagnostics.

use bytelang_diagnostic::{Diagnostic, ErrorCode};
use bytelang_ir::Operator;
use thiserror::Error;

use crate::PrimitiveType;

/// Failure to apply an operator to compile-time values.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OpError {
    #[error("operator `{op}` is not supported for {kind}")]
    Unsupported { op: Operator, kind: &'static str },

    #[error("operator `{op}` cannot combine {left} and {right}")]
    TypeMismatch {
        op: Operator,
        left: &'static str,
        right: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic overflow in `{op}`")]
    Overflow { op: Operator },
}

impl OpError {
    pub fn code(&self) -> ErrorCode {
        match self {
            OpError::Unsupported { .. } | OpError::TypeMismatch { .. } => ErrorCode::E2004,
            OpError::DivisionByZero => ErrorCode::E2005,
            OpError::Overflow { .. } => ErrorCode::E2006,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code()).with_message(self.to_string())
    }
}

/// Failure to encode or decode one primitive.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PackError {
    #[error("value {value} does not fit in `{primitive}`")]
    OutOfRange {
        value: String,
        primitive: PrimitiveType,
    },

    #[error("value {value} is not exactly representable in `{primitive}`")]
    Inexact {
        value: String,
        primitive: PrimitiveType,
    },

    #[error("cannot pack a float into integer type `{primitive}`")]
    FloatIntoInteger { primitive: PrimitiveType },

    #[error("expected a number for `{primitive}`, found {found}")]
    NotNumeric {
        primitive: PrimitiveType,
        found: &'static str,
    },

    #[error("`{primitive}` needs {expected} bytes, got {found}")]
    InvalidLength {
        primitive: PrimitiveType,
        expected: usize,
        found: usize,
    },
}

impl PackError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PackError::OutOfRange { .. } | PackError::Inexact { .. } => ErrorCode::E2010,
            PackError::FloatIntoInteger { .. } | PackError::NotNumeric { .. } => ErrorCode::E2004,
            PackError::InvalidLength { .. } => ErrorCode::E2011,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code()).with_message(self.to_string())
    }
}
