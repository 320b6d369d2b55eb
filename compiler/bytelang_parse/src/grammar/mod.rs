//! Grammar productions, one module per unit kind.
//!
//! Expressions, types and the common directives are shared; each unit
//! grammar extends the common directive table with its own entries.

mod common;
mod environment;
mod expr;
mod package;
mod sketch;
mod ty;

use bytelang_diagnostic::Outcome;
use bytelang_ir::{
    CommonDirective, EnvironmentStatement, ImmediateRegistry, PackageStatement, SketchStatement,
};

use crate::Parser;

/// Parses the remainder of a directive after its marker.
pub type DirectiveFn<S> = fn(&mut Parser<'_>) -> Outcome<S>;

/// Statement set of one unit kind.
pub trait Grammar {
    type Statement: From<CommonDirective>;

    /// Unit name used in diagnostics.
    const UNIT: &'static str;

    /// Directive name (without the leading `.`) to parse function.
    fn directives() -> ImmediateRegistry<DirectiveFn<Self::Statement>>;

    /// A statement that does not start with a directive marker.
    fn plain_statement(p: &mut Parser<'_>) -> Outcome<Self::Statement> {
        p.misplaced(Self::UNIT)
    }
}

/// Directives shared by all units.
fn common_directives<S: From<CommonDirective>>() -> Vec<(&'static str, DirectiveFn<S>)> {
    vec![
        ("const", common::const_directive::<S> as DirectiveFn<S>),
        ("struct", common::struct_directive::<S> as DirectiveFn<S>),
        ("macro", common::macro_directive::<S> as DirectiveFn<S>),
        ("type", common::type_directive::<S> as DirectiveFn<S>),
    ]
}

pub struct CommonGrammar;

impl Grammar for CommonGrammar {
    type Statement = CommonDirective;
    const UNIT: &'static str = "common";

    fn directives() -> ImmediateRegistry<DirectiveFn<CommonDirective>> {
        ImmediateRegistry::new("directive", common_directives())
    }
}

pub struct PackageGrammar;

impl Grammar for PackageGrammar {
    type Statement = PackageStatement;
    const UNIT: &'static str = "package";

    fn directives() -> ImmediateRegistry<DirectiveFn<PackageStatement>> {
        let mut table = common_directives();
        table.push(("inst", package::inst_directive as DirectiveFn<_>));
        ImmediateRegistry::new("directive", table)
    }
}

pub struct EnvironmentGrammar;

impl Grammar for EnvironmentGrammar {
    type Statement = EnvironmentStatement;
    const UNIT: &'static str = "environment";

    fn directives() -> ImmediateRegistry<DirectiveFn<EnvironmentStatement>> {
        let mut table = common_directives();
        table.extend([
            ("use", environment::use_directive as DirectiveFn<_>),
            ("ptr_prog", environment::ptr_prog_directive as DirectiveFn<_>),
            ("ptr_inst", environment::ptr_inst_directive as DirectiveFn<_>),
            ("ptr_data", environment::ptr_data_directive as DirectiveFn<_>),
        ]);
        ImmediateRegistry::new("directive", table)
    }
}

pub struct SketchGrammar;

impl Grammar for SketchGrammar {
    type Statement = SketchStatement;
    const UNIT: &'static str = "sketch";

    fn directives() -> ImmediateRegistry<DirectiveFn<SketchStatement>> {
        let mut table = common_directives();
        table.extend([
            ("env", sketch::env_directive as DirectiveFn<_>),
            ("mark", sketch::mark_directive as DirectiveFn<_>),
            ("var", sketch::var_directive as DirectiveFn<_>),
        ]);
        ImmediateRegistry::new("directive", table)
    }

    /// A bare identifier starts an instruction call.
    fn plain_statement(p: &mut Parser<'_>) -> Outcome<SketchStatement> {
        if p.cursor.check_ident() {
            sketch::instruction_call(p)
        } else {
            p.misplaced(Self::UNIT)
        }
    }
}
