//! The `check` and `build` commands: compile a sketch against the catalogs.

use std::fmt::Write as _;
use std::path::Path;

use bytelang_diagnostic::Diagnostic;
use bytelang_ir::Registry;
use bytelang_sema::{SketchBundle, SketchCompiler};
use tracing::info;

use super::{hex, read_file, Failure, Options};
use crate::catalog::{CatalogError, DirectoryCatalog};

fn compile(path: &str, root: &Path) -> Result<SketchBundle, Failure> {
    let source = read_file(path)?;
    let mut compiler = SketchCompiler::new(
        DirectoryCatalog::environments(root),
        DirectoryCatalog::packages(root),
    );
    compiler
        .compile(&source)
        .map_err(|errors| Failure::new(path, Some(source.clone()), errors))
}

/// Compile a sketch and report whether it is valid.
pub fn check_file(path: &str, options: &Options) -> Result<String, Failure> {
    let bundle = compile(path, &options.root)?;
    Ok(format!(
        "OK: {path} ({} calls, {} code bytes, {} data bytes)\n",
        bundle.calls.len(),
        bundle.code.len(),
        bundle.data.len()
    ))
}

/// Compile a sketch, then write its image to `-o` or describe the program.
pub fn build_file(path: &str, options: &Options) -> Result<String, Failure> {
    let bundle = compile(path, &options.root)?;
    let Some(output) = &options.output else {
        return Ok(describe(&bundle));
    };

    let image = bundle.image();
    std::fs::write(output, &image).map_err(|source| {
        let error = CatalogError::Unwritable {
            path: output.clone(),
            source,
        };
        Failure::new(path, None, vec![Diagnostic::from(error)])
    })?;
    info!(path = %output.display(), bytes = image.len(), "wrote image");
    Ok(format!(
        "Wrote {} bytes to {} ({} code, {} data)\n",
        image.len(),
        output.display(),
        bundle.code.len(),
        bundle.data.len()
    ))
}

/// Human-readable listing of a compiled sketch.
pub(crate) fn describe(bundle: &SketchBundle) -> String {
    let mut out = String::new();
    let environment = bundle.environment.as_deref().unwrap_or("(none)");
    let _ = writeln!(out, "environment: {environment}");

    let _ = writeln!(out, "code ({} bytes):", bundle.code.len());
    for call in &bundle.calls {
        let _ = writeln!(
            out,
            "  {:04X}  {:<12} {}",
            call.offset,
            call.instruction,
            hex(&call.bytes)
        );
    }

    if !bundle.marks.is_empty() {
        let _ = writeln!(out, "marks:");
        for (name, offset) in bundle.marks.items() {
            let _ = writeln!(out, "  {name} = {offset}");
        }
    }

    if !bundle.variables.is_empty() {
        let _ = writeln!(out, "variables:");
        for (name, variable) in bundle.variables.items() {
            let _ = writeln!(
                out,
                "  {:04X}  {name}: {} = {}",
                variable.address,
                variable.ty,
                hex(&variable.bytes)
            );
        }
    }
    let _ = writeln!(out, "data ({} bytes)", bundle.data.len());
    out
}
