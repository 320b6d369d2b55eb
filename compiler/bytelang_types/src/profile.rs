//! Resolved type descriptors and their byte encoding.
//!
//! Struct and array encodings are positional concatenation with no padding.
//! Errors from separate elements are collected, not short-circuited.

use std::fmt;

use bytelang_diagnostic::{
    count_mismatch, missing_precondition, Accumulator, Diagnostic, ErrorCode, Outcome,
};
use bytelang_ir::Span;

use crate::{PrimitiveType, RValue};

/// A resolved type.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeProfile {
    Primitive(PrimitiveType),
    /// Pointer to `target`. `width` is `None` until the pointer is bound to
    /// an environment's data pointer.
    Pointer {
        target: Box<TypeProfile>,
        width: Option<PrimitiveType>,
    },
    Array {
        element: Box<TypeProfile>,
        length: usize,
    },
    /// Fields in declaration order.
    Struct {
        name: String,
        fields: Vec<(String, TypeProfile)>,
    },
}

impl TypeProfile {
    /// Unbound pointer to `target`.
    pub fn pointer(target: TypeProfile) -> Self {
        TypeProfile::Pointer {
            target: Box::new(target),
            width: None,
        }
    }

    pub fn array(element: TypeProfile, length: usize) -> Self {
        TypeProfile::Array {
            element: Box::new(element),
            length,
        }
    }

    /// Encoded size in bytes; `None` if it contains an unbound pointer.
    pub fn size(&self) -> Option<usize> {
        match self {
            TypeProfile::Primitive(p) => Some(p.size()),
            TypeProfile::Pointer { width, .. } => width.map(PrimitiveType::size),
            TypeProfile::Array { element, length } => element.size()?.checked_mul(*length),
            TypeProfile::Struct { fields, .. } => fields
                .iter()
                .try_fold(0usize, |total, (_, ty)| total.checked_add(ty.size()?)),
        }
    }

    /// Copy of this profile with every pointer bound to `data_pointer`.
    #[must_use]
    pub fn bind_pointers(&self, data_pointer: PrimitiveType) -> TypeProfile {
        match self {
            TypeProfile::Primitive(p) => TypeProfile::Primitive(*p),
            TypeProfile::Pointer { target, .. } => TypeProfile::Pointer {
                target: Box::new(target.bind_pointers(data_pointer)),
                width: Some(data_pointer),
            },
            TypeProfile::Array { element, length } => {
                TypeProfile::array(element.bind_pointers(data_pointer), *length)
            }
            TypeProfile::Struct { name, fields } => TypeProfile::Struct {
                name: name.clone(),
                fields: fields
                    .iter()
                    .map(|(field, ty)| (field.clone(), ty.bind_pointers(data_pointer)))
                    .collect(),
            },
        }
    }

    /// Encode `value`.
    pub fn pack(&self, value: &RValue) -> Outcome<Vec<u8>> {
        match self {
            TypeProfile::Primitive(p) => p.pack(value).map_err(|e| vec![e.to_diagnostic()]),
            TypeProfile::Pointer { width: None, .. } => Err(vec![self.unbound()]),
            // A pointer's value is an address.
            TypeProfile::Pointer {
                width: Some(width), ..
            } => width.pack(value).map_err(|e| vec![e.to_diagnostic()]),
            TypeProfile::Array { element, length } => {
                let items = self.items(value, *length)?;
                pack_all(items.iter().map(|item| element.pack(item)))
            }
            TypeProfile::Struct { fields, .. } => {
                let items = self.items(value, fields.len())?;
                pack_all(fields.iter().zip(items).map(|((_, ty), item)| ty.pack(item)))
            }
        }
    }

    /// Decode exactly `size()` bytes.
    pub fn unpack(&self, bytes: &[u8]) -> Outcome<RValue> {
        match self {
            TypeProfile::Primitive(p) => p.unpack(bytes).map_err(|e| vec![e.to_diagnostic()]),
            TypeProfile::Pointer { width: None, .. } => Err(vec![self.unbound()]),
            TypeProfile::Pointer {
                width: Some(width), ..
            } => width.unpack(bytes).map_err(|e| vec![e.to_diagnostic()]),
            TypeProfile::Array { element, length } => {
                self.check_length(bytes)?;
                unpack_all(bytes, std::iter::repeat(element.as_ref()).take(*length))
            }
            TypeProfile::Struct { fields, .. } => {
                self.check_length(bytes)?;
                unpack_all(bytes, fields.iter().map(|(_, ty)| ty))
            }
        }
    }

    /// Elements of an initializer list of exactly `expected` items.
    fn items<'v>(&self, value: &'v RValue, expected: usize) -> Outcome<&'v [RValue]> {
        match value {
            RValue::InitializerList(items) if items.len() == expected => Ok(items.as_slice()),
            RValue::InitializerList(items) => {
                Err(vec![count_mismatch(Span::DUMMY, expected, items.len())
                    .with_note(format!("while packing `{self}`"))])
            }
            other => Err(vec![Diagnostic::error(ErrorCode::E2004)
                .with_message(format!(
                    "expected an initializer list for `{self}`, found {}",
                    other.kind_name()
                ))]),
        }
    }

    fn check_length(&self, bytes: &[u8]) -> Outcome<()> {
        let Some(size) = self.size() else {
            return Err(vec![self.unbound()]);
        };
        if bytes.len() == size {
            Ok(())
        } else {
            Err(vec![Diagnostic::error(ErrorCode::E2011)
                .with_message(format!(
                    "`{self}` needs {size} bytes, got {}",
                    bytes.len()
                ))])
        }
    }

    fn unbound(&self) -> Diagnostic {
        missing_precondition(
            Span::DUMMY,
            format!("pointer in `{self}` has no width outside an environment"),
        )
    }
}

fn pack_all(parts: impl Iterator<Item = Outcome<Vec<u8>>>) -> Outcome<Vec<u8>> {
    let mut acc = Accumulator::new();
    let mut bytes = Vec::new();
    for part in parts {
        if let Some(part) = acc.take(part) {
            bytes.extend(part);
        }
    }
    acc.finish(bytes)
}

/// Decode consecutive fields; `bytes` has already been length-checked.
fn unpack_all<'t>(bytes: &[u8], fields: impl Iterator<Item = &'t TypeProfile>) -> Outcome<RValue> {
    let mut acc = Accumulator::new();
    let mut items = Vec::new();
    let mut offset = 0;
    for ty in fields {
        let Some(size) = ty.size() else {
            acc.push(ty.unbound());
            continue;
        };
        let chunk = bytes.get(offset..offset + size).unwrap_or_default();
        offset += size;
        if let Some(item) = acc.take(ty.unpack(chunk)) {
            items.push(item);
        }
    }
    acc.finish(RValue::InitializerList(items))
}

impl From<PrimitiveType> for TypeProfile {
    fn from(p: PrimitiveType) -> Self {
        TypeProfile::Primitive(p)
    }
}

impl fmt::Display for TypeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeProfile::Primitive(p) => write!(f, "{p}"),
            TypeProfile::Pointer { target, .. } => write!(f, "*{target}"),
            TypeProfile::Array { element, length } => write!(f, "[{length}]{element}"),
            TypeProfile::Struct { name, .. } => f.write_str(name),
        }
    }
}
