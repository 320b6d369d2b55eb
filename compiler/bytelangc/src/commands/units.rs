//! The `package` and `env` commands: compile one catalog unit and list it.

use std::fmt::Write as _;

use bytelang_ir::Registry;
use bytelang_sema::{
    compile_environment_source, compile_package_source, CommonContext, PackageRegistry,
};

use super::{hex, Failure, Options};
use crate::catalog::DirectoryCatalog;

/// Compile `<root>/packages/<id>.bls` and list its instructions.
pub fn show_package(id: &str, options: &Options) -> Result<String, Failure> {
    let catalog = DirectoryCatalog::packages(&options.root);
    let path = catalog.path_for(id).display().to_string();
    let source = catalog
        .read(id)
        .map_err(|e| Failure::new(path.clone(), None, vec![e.into()]))?;

    let mut common = CommonContext::new();
    let bundle = compile_package_source(id, &source, &mut common)
        .map_err(|errors| Failure::new(path.clone(), Some(source.clone()), errors))?;

    let mut out = format!(
        "package {} ({} instructions)\n",
        bundle.name,
        bundle.instructions.len()
    );
    for (name, profile) in bundle.instructions.items() {
        let _ = writeln!(out, "  {name}{profile}");
    }
    Ok(out)
}

/// Compile `<root>/envs/<id>.bls`, loading its packages, and list the
/// opcode table.
pub fn show_environment(id: &str, options: &Options) -> Result<String, Failure> {
    let catalog = DirectoryCatalog::environments(&options.root);
    let path = catalog.path_for(id).display().to_string();
    let source = catalog
        .read(id)
        .map_err(|e| Failure::new(path.clone(), None, vec![e.into()]))?;

    let mut common = CommonContext::new();
    let mut packages = PackageRegistry::from_catalog(DirectoryCatalog::packages(&options.root));
    let bundle = compile_environment_source(id, &source, &mut common, &mut packages)
        .map_err(|errors| Failure::new(path.clone(), Some(source.clone()), errors))?;

    let pointers = bundle.pointers;
    let mut out = format!(
        "environment {} (program {}, instruction {}, data {})\n",
        bundle.name, pointers.program, pointers.instruction, pointers.data
    );
    for (name, encoded) in bundle.instructions.items() {
        let _ = write!(out, "  {:<6} {name}{}", hex(&encoded.code), encoded.profile);
        match encoded.profile.args_size() {
            Some(size) => {
                let _ = writeln!(out, ", {size} argument bytes");
            }
            None => out.push('\n'),
        }
    }
    Ok(out)
}
