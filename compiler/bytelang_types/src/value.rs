//! Compile-time values and operator application.

use std::fmt;

use bytelang_ir::Operator;

use crate::OpError;

/// A value produced by constant evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum RValue {
    Integer(i64),
    Float(f64),
    /// `{a, b, ...}`: the value of a struct or array.
    InitializerList(Vec<RValue>),
}

impl RValue {
    /// Name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RValue::Integer(_) => "integer",
            RValue::Float(_) => "float",
            RValue::InitializerList(_) => "initializer list",
        }
    }

    /// Numeric value as a float, with integers promoted.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RValue::Integer(n) => Some(*n as f64),
            RValue::Float(x) => Some(*x),
            RValue::InitializerList(_) => None,
        }
    }

    /// Apply a prefix operator. Only `-` is defined.
    pub fn apply_unary(&self, op: Operator) -> Result<RValue, OpError> {
        match (op, self) {
            (Operator::Minus, RValue::Integer(n)) => n
                .checked_neg()
                .map(RValue::Integer)
                .ok_or(OpError::Overflow { op }),
            (Operator::Minus, RValue::Float(x)) => Ok(RValue::Float(-x)),
            _ => Err(OpError::Unsupported {
                op,
                kind: self.kind_name(),
            }),
        }
    }

    /// Apply an infix operator.
    ///
    /// Two integers stay integers (checked). A float on either side promotes
    /// the other. `/` always divides as floats.
    pub fn apply_binary(&self, other: &RValue, op: Operator) -> Result<RValue, OpError> {
        if let (RValue::Integer(a), RValue::Integer(b)) = (self, other) {
            let checked = match op {
                Operator::Plus => a.checked_add(*b),
                Operator::Minus => a.checked_sub(*b),
                Operator::Star => a.checked_mul(*b),
                Operator::Slash => return divide(self, other),
            };
            return checked.map(RValue::Integer).ok_or(OpError::Overflow { op });
        }

        let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) else {
            return Err(OpError::TypeMismatch {
                op,
                left: self.kind_name(),
                right: other.kind_name(),
            });
        };
        match op {
            Operator::Plus => Ok(RValue::Float(a + b)),
            Operator::Minus => Ok(RValue::Float(a - b)),
            Operator::Star => Ok(RValue::Float(a * b)),
            Operator::Slash => divide(self, other),
        }
    }
}

fn divide(left: &RValue, right: &RValue) -> Result<RValue, OpError> {
    let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
        return Err(OpError::TypeMismatch {
            op: Operator::Slash,
            left: left.kind_name(),
            right: right.kind_name(),
        });
    };
    if b == 0.0 {
        return Err(OpError::DivisionByZero);
    }
    Ok(RValue::Float(a / b))
}

impl fmt::Display for RValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RValue::Integer(n) => write!(f, "{n}"),
            RValue::Float(x) => write!(f, "{x:?}"),
            RValue::InitializerList(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}
