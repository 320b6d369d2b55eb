//! Compiled unit outputs.

use std::fmt;

use bytelang_ir::{ImmediateRegistry, Span};
use bytelang_types::{PrimitiveType, RValue, TypeProfile};

/// An instruction signature declared by a package.
#[derive(Clone, Debug, PartialEq)]
pub struct InstructionProfile {
    pub fields: Vec<(String, TypeProfile)>,
}

impl InstructionProfile {
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Argument bytes following the opcode; `None` while pointers are unbound.
    pub fn args_size(&self) -> Option<usize> {
        self.fields
            .iter()
            .try_fold(0usize, |total, (_, ty)| total.checked_add(ty.size()?))
    }

    #[must_use]
    pub fn bind_pointers(&self, data_pointer: PrimitiveType) -> InstructionProfile {
        InstructionProfile {
            fields: self
                .fields
                .iter()
                .map(|(name, ty)| (name.clone(), ty.bind_pointers(data_pointer)))
                .collect(),
        }
    }
}

impl fmt::Display for InstructionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, (name, ty)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {ty}")?;
        }
        f.write_str(")")
    }
}

/// A compiled package: its instruction signatures in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct PackageBundle {
    pub name: String,
    pub instructions: ImmediateRegistry<InstructionProfile>,
}

/// An instruction imported into an environment, with its assigned opcode.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedInstructionProfile {
    pub profile: InstructionProfile,
    pub opcode: usize,
    /// `opcode` packed with the instruction pointer width.
    pub code: Vec<u8>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PointerWidths {
    pub program: PrimitiveType,
    pub instruction: PrimitiveType,
    pub data: PrimitiveType,
}

/// A compiled environment: the selected instruction table and pointer widths.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvironmentBundle {
    pub name: String,
    /// Ordered by opcode.
    pub instructions: ImmediateRegistry<EncodedInstructionProfile>,
    pub pointers: PointerWidths,
}

/// An instruction call turned into bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedCall {
    pub instruction: String,
    pub opcode: usize,
    /// Position of the first byte in the code section.
    pub offset: usize,
    pub bytes: Vec<u8>,
    pub span: Span,
}

/// A `.var` placed in the data section.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub ty: TypeProfile,
    pub address: usize,
    pub bytes: Vec<u8>,
}

/// A compiled sketch.
#[derive(Clone, Debug, PartialEq)]
pub struct SketchBundle {
    /// Name of the selected environment, if any.
    pub environment: Option<String>,
    pub calls: Vec<ResolvedCall>,
    pub code: Vec<u8>,
    /// Code offsets, as integers.
    pub marks: ImmediateRegistry<RValue>,
    pub variables: ImmediateRegistry<Variable>,
    pub data: Vec<u8>,
}

impl SketchBundle {
    /// Code section followed by the data section.
    pub fn image(&self) -> Vec<u8> {
        let mut image = Vec::with_capacity(self.code.len() + self.data.len());
        image.extend_from_slice(&self.code);
        image.extend_from_slice(&self.data);
        image
    }
}
