//! The shared common context and the trait every unit context implements.

use bytelang_diagnostic::Outcome;
use bytelang_ir::{ImmediateRegistry, MutableRegistry, Registry};
use bytelang_types::{primitive_registry, PrimitiveType, RValue, TypeProfile};

use crate::MacroProfile;

/// Constants, macros and types shared by every unit of one compilation.
///
/// The type registry starts out holding the primitives, so `u8` and a
/// user struct resolve through the same lookup.
#[derive(Clone, Debug)]
pub struct CommonContext {
    pub constants: MutableRegistry<RValue>,
    pub macros: MutableRegistry<MacroProfile>,
    pub types: MutableRegistry<TypeProfile>,
    primitives: ImmediateRegistry<PrimitiveType>,
}

impl CommonContext {
    pub fn new() -> Self {
        let primitives = primitive_registry();
        let types = MutableRegistry::seeded(
            "type",
            primitives
                .items()
                .map(|(name, p)| (name.to_string(), TypeProfile::Primitive(*p))),
        );
        CommonContext {
            constants: MutableRegistry::new("constant"),
            macros: MutableRegistry::new("macro"),
            types,
            primitives,
        }
    }

    pub fn primitives(&self) -> &ImmediateRegistry<PrimitiveType> {
        &self.primitives
    }

    /// Run `compile` against a copy of the context and keep the copy only
    /// if it succeeds. A failed unit leaves no definitions behind.
    pub fn staged<T>(
        &mut self,
        compile: impl FnOnce(&mut CommonContext) -> Outcome<T>,
    ) -> Outcome<T> {
        let mut staged = self.clone();
        let result = compile(&mut staged);
        if result.is_ok() {
            *self = staged;
        }
        result
    }
}

impl Default for CommonContext {
    fn default() -> Self {
        Self::new()
    }
}

/// What constant evaluation and type resolution need from a unit context.
pub trait SemanticContext {
    fn common(&self) -> &CommonContext;

    fn common_mut(&mut self) -> &mut CommonContext;

    /// Width that pointers resolve to. `None` leaves them unbound.
    fn data_pointer(&self) -> Option<PrimitiveType> {
        None
    }

    /// Unit-level value for `name`, consulted after the constants.
    fn lookup_value(&self, _name: &str) -> Option<RValue> {
        None
    }
}

impl SemanticContext for CommonContext {
    fn common(&self) -> &CommonContext {
        self
    }

    fn common_mut(&mut self) -> &mut CommonContext {
        self
    }
}
