//! Fixed-width little-endian primitives.

use std::fmt;

use bytelang_ir::ImmediateRegistry;

use crate::{PackError, RValue};

/// A built-in numeric type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl PrimitiveType {
    /// All primitives in registry order.
    pub const ALL: [PrimitiveType; 10] = [
        PrimitiveType::I8,
        PrimitiveType::U8,
        PrimitiveType::I16,
        PrimitiveType::U16,
        PrimitiveType::I32,
        PrimitiveType::U32,
        PrimitiveType::I64,
        PrimitiveType::U64,
        PrimitiveType::F32,
        PrimitiveType::F64,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::I8 => "i8",
            PrimitiveType::U8 => "u8",
            PrimitiveType::I16 => "i16",
            PrimitiveType::U16 => "u16",
            PrimitiveType::I32 => "i32",
            PrimitiveType::U32 => "u32",
            PrimitiveType::I64 => "i64",
            PrimitiveType::U64 => "u64",
            PrimitiveType::F32 => "f32",
            PrimitiveType::F64 => "f64",
        }
    }

    /// Width in bytes.
    pub fn size(self) -> usize {
        match self {
            PrimitiveType::I8 | PrimitiveType::U8 => 1,
            PrimitiveType::I16 | PrimitiveType::U16 => 2,
            PrimitiveType::I32 | PrimitiveType::U32 | PrimitiveType::F32 => 4,
            PrimitiveType::I64 | PrimitiveType::U64 | PrimitiveType::F64 => 8,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveType::F32 | PrimitiveType::F64)
    }

    /// Inclusive integer range, for integer primitives.
    fn int_range(self) -> Option<(i128, i128)> {
        let range: (i128, i128) = match self {
            PrimitiveType::I8 => (i8::MIN.into(), i8::MAX.into()),
            PrimitiveType::U8 => (0, u8::MAX.into()),
            PrimitiveType::I16 => (i16::MIN.into(), i16::MAX.into()),
            PrimitiveType::U16 => (0, u16::MAX.into()),
            PrimitiveType::I32 => (i32::MIN.into(), i32::MAX.into()),
            PrimitiveType::U32 => (0, u32::MAX.into()),
            PrimitiveType::I64 => (i64::MIN.into(), i64::MAX.into()),
            PrimitiveType::U64 => (0, u64::MAX.into()),
            PrimitiveType::F32 | PrimitiveType::F64 => return None,
        };
        Some(range)
    }

    /// Encode `value` as little-endian bytes.
    ///
    /// Integers must fit the range. A float type takes an integer or a float
    /// only when the conversion is exact, so unpacking gives back the same
    /// number (an integer comes back as a float). Floats packed into an
    /// integer type are rejected.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::float_cmp
    )]
    pub fn pack(self, value: &RValue) -> Result<Vec<u8>, PackError> {
        match (self, value) {
            (PrimitiveType::F32, RValue::Integer(n)) => {
                let x = *n as f32;
                self.exact(value, x as i128 == i128::from(*n))?;
                Ok(x.to_le_bytes().to_vec())
            }
            (PrimitiveType::F64, RValue::Integer(n)) => {
                let x = *n as f64;
                self.exact(value, x as i128 == i128::from(*n))?;
                Ok(x.to_le_bytes().to_vec())
            }
            (PrimitiveType::F32, RValue::Float(x)) => {
                let narrowed = *x as f32;
                if x.is_finite() && narrowed.is_infinite() {
                    return Err(self.out_of_range(value));
                }
                self.exact(value, x.is_nan() || f64::from(narrowed) == *x)?;
                Ok(narrowed.to_le_bytes().to_vec())
            }
            (PrimitiveType::F64, RValue::Float(x)) => Ok(x.to_le_bytes().to_vec()),
            (_, RValue::Float(_)) => Err(PackError::FloatIntoInteger { primitive: self }),
            (_, RValue::Integer(n)) => {
                let (min, max) = self.int_range().unwrap_or((0, 0));
                let wide = i128::from(*n);
                if wide < min || wide > max {
                    return Err(self.out_of_range(value));
                }
                // In range, so the low `size()` bytes are the two's complement encoding.
                Ok(n.to_le_bytes()[..self.size()].to_vec())
            }
            (_, RValue::InitializerList(_)) => Err(PackError::NotNumeric {
                primitive: self,
                found: value.kind_name(),
            }),
        }
    }

    /// Decode exactly `size()` little-endian bytes.
    pub fn unpack(self, bytes: &[u8]) -> Result<RValue, PackError> {
        if bytes.len() != self.size() {
            return Err(PackError::InvalidLength {
                primitive: self,
                expected: self.size(),
                found: bytes.len(),
            });
        }
        let mut buf = [0u8; 8];
        buf[..bytes.len()].copy_from_slice(bytes);

        let value = match self {
            PrimitiveType::I8 => RValue::Integer(i8::from_le_bytes([buf[0]]).into()),
            PrimitiveType::U8 => RValue::Integer(buf[0].into()),
            PrimitiveType::I16 => RValue::Integer(i16::from_le_bytes([buf[0], buf[1]]).into()),
            PrimitiveType::U16 => RValue::Integer(u16::from_le_bytes([buf[0], buf[1]]).into()),
            PrimitiveType::I32 => {
                RValue::Integer(i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]).into())
            }
            PrimitiveType::U32 => {
                RValue::Integer(u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]).into())
            }
            PrimitiveType::I64 => RValue::Integer(i64::from_le_bytes(buf)),
            PrimitiveType::U64 => {
                let raw = u64::from_le_bytes(buf);
                let n = i64::try_from(raw).map_err(|_| PackError::OutOfRange {
                    value: raw.to_string(),
                    primitive: self,
                })?;
                RValue::Integer(n)
            }
            PrimitiveType::F32 => {
                RValue::Float(f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]).into())
            }
            PrimitiveType::F64 => RValue::Float(f64::from_le_bytes(buf)),
        };
        Ok(value)
    }

    fn exact(self, value: &RValue, exact: bool) -> Result<(), PackError> {
        if exact {
            return Ok(());
        }
        Err(PackError::Inexact {
            value: value.to_string(),
            primitive: self,
        })
    }

    fn out_of_range(self, value: &RValue) -> PackError {
        PackError::OutOfRange {
            value: value.to_string(),
            primitive: self,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry of all primitives by name.
pub fn primitive_registry() -> ImmediateRegistry<PrimitiveType> {
    ImmediateRegistry::new(
        "primitive type",
        PrimitiveType::ALL.iter().map(|p| (p.name(), *p)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bytelang_ir::Registry;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_u8_200() {
        assert_eq!(PrimitiveType::U8.pack(&RValue::Integer(200)).unwrap(), vec![0xC8]);
        assert_eq!(PrimitiveType::U8.unpack(&[0xC8]).unwrap(), RValue::Integer(200));
    }

    #[test]
    fn test_little_endian() {
        assert_eq!(
            PrimitiveType::U16.pack(&RValue::Integer(0x1234)).unwrap(),
            vec![0x34, 0x12]
        );
        assert_eq!(
            PrimitiveType::I32.pack(&RValue::Integer(-2)).unwrap(),
            vec![0xFE, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(
            PrimitiveType::F32.pack(&RValue::Float(1.0)).unwrap(),
            1.0f32.to_le_bytes().to_vec()
        );
    }

    #[test]
    fn test_range_checks() {
        let err = PrimitiveType::U8.pack(&RValue::Integer(256)).unwrap_err();
        assert_eq!(err.code(), bytelang_diagnostic::ErrorCode::E2010);
        assert!(PrimitiveType::U8.pack(&RValue::Integer(-1)).is_err());
        assert!(PrimitiveType::I8.pack(&RValue::Integer(-128)).is_ok());
        assert!(PrimitiveType::I8.pack(&RValue::Integer(128)).is_err());
        assert!(PrimitiveType::F32.pack(&RValue::Float(1e300)).is_err());
    }

    #[test]
    fn test_float_into_integer_rejected() {
        assert_eq!(
            PrimitiveType::U16.pack(&RValue::Float(1.0)),
            Err(PackError::FloatIntoInteger {
                primitive: PrimitiveType::U16
            })
        );
    }

    #[test]
    fn test_integer_into_float_converted() {
        let bytes = PrimitiveType::F64.pack(&RValue::Integer(3)).unwrap();
        assert_eq!(bytes, 3.0f64.to_le_bytes().to_vec());
        assert_eq!(PrimitiveType::F64.unpack(&bytes).unwrap(), RValue::Float(3.0));

        let bytes = PrimitiveType::F32.pack(&RValue::Integer(16_777_216)).unwrap();
        assert_eq!(PrimitiveType::F32.unpack(&bytes).unwrap(), RValue::Float(16_777_216.0));
    }

    #[test]
    fn test_inexact_float_rejected() {
        let err = PrimitiveType::F32.pack(&RValue::Integer(16_777_217)).unwrap_err();
        assert_eq!(err.code(), bytelang_diagnostic::ErrorCode::E2010);
        assert!(matches!(err, PackError::Inexact { .. }));

        assert!(PrimitiveType::F64.pack(&RValue::Integer(i64::MAX)).is_err());
        assert!(PrimitiveType::F32.pack(&RValue::Float(0.1)).is_err());
        assert!(PrimitiveType::F32.pack(&RValue::Float(0.5)).is_ok());
        assert!(PrimitiveType::F64.pack(&RValue::Float(0.1)).is_ok());
    }

    #[test]
    fn test_list_rejected() {
        let err = PrimitiveType::U8
            .pack(&RValue::InitializerList(vec![]))
            .unwrap_err();
        assert!(matches!(err, PackError::NotNumeric { .. }));
    }

    #[test]
    fn test_unpack_length() {
        let err = PrimitiveType::U16.unpack(&[1]).unwrap_err();
        assert_eq!(
            err,
            PackError::InvalidLength {
                primitive: PrimitiveType::U16,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_u64_beyond_i64() {
        assert!(PrimitiveType::U64.unpack(&[0xFF; 8]).is_err());
    }

    #[test]
    fn test_registry_order() {
        let registry = primitive_registry();
        let names: Vec<_> = registry.items().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            vec!["i8", "u8", "i16", "u16", "i32", "u32", "i64", "u64", "f32", "f64"]
        );
        assert_eq!(registry.get("u16").unwrap().size(), 2);
        assert!(registry.get("u128").is_err());
    }

    fn int_primitive() -> impl Strategy<Value = PrimitiveType> {
        prop::sample::select(
            PrimitiveType::ALL
                .iter()
                .copied()
                .filter(|p| !p.is_float())
                .collect::<Vec<_>>(),
        )
    }

    proptest! {
        #[test]
        fn integer_round_trip(p in int_primitive(), n in any::<i64>()) {
            let value = RValue::Integer(n);
            match p.pack(&value) {
                Ok(bytes) => {
                    prop_assert_eq!(bytes.len(), p.size());
                    prop_assert_eq!(p.unpack(&bytes).unwrap(), value);
                }
                Err(e) => {
                    let out_of_range = matches!(e, PackError::OutOfRange { .. });
                    prop_assert!(out_of_range);
                }
            }
        }

        #[test]
        fn float_round_trip(x in any::<f64>().prop_filter("not NaN", |x| !x.is_nan())) {
            let value = RValue::Float(x);
            let bytes = PrimitiveType::F64.pack(&value).unwrap();
            prop_assert_eq!(PrimitiveType::F64.unpack(&bytes).unwrap(), value.clone());

            // f32 takes exactly the values it can hold and returns them unchanged.
            #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
            let fits = f64::from(x as f32) == x;
            match PrimitiveType::F32.pack(&value) {
                Ok(bytes) => {
                    prop_assert!(fits);
                    prop_assert_eq!(PrimitiveType::F32.unpack(&bytes).unwrap(), value);
                }
                Err(_) => prop_assert!(!fits),
            }
        }

        #[test]
        fn integer_into_float_round_trip(n in any::<i64>()) {
            let value = RValue::Integer(n);
            for p in [PrimitiveType::F32, PrimitiveType::F64] {
                if let Ok(bytes) = p.pack(&value) {
                    #[allow(clippy::cast_precision_loss)]
                    let widened = n as f64;
                    prop_assert_eq!(p.unpack(&bytes).unwrap(), RValue::Float(widened));
                }
            }
        }
    }
}
