//! Command handlers for the `bytelang` CLI.
//!
//! Handlers return their report as text on success and a [`Failure`] with
//! renderable diagnostics otherwise; printing and exit codes belong to the
//! binary.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use bytelang_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use bytelang_diagnostic::Diagnostic;

use crate::catalog::read_source;

mod build;
mod debug;
mod units;

pub use build::{build_file, check_file};
pub use debug::{lex_file, parse_file};
pub use units::{show_environment, show_package};

/// Unit grammar selected by `parse --unit`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UnitKind {
    Common,
    Package,
    Environment,
    #[default]
    Sketch,
}

impl UnitKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "common" => Some(UnitKind::Common),
            "package" => Some(UnitKind::Package),
            "env" | "environment" => Some(UnitKind::Environment),
            "sketch" => Some(UnitKind::Sketch),
            _ => None,
        }
    }
}

/// Flags shared by the commands. Each command reads the ones it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Catalog root holding `packages/` and `envs/`.
    pub root: PathBuf,
    pub output: Option<PathBuf>,
    pub unit: UnitKind,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            root: std::env::var_os("BYTELANG_ROOT").map_or_else(|| PathBuf::from("."), PathBuf::from),
            output: None,
            unit: UnitKind::default(),
        }
    }
}

impl Options {
    /// Split `args` into options and positional arguments.
    pub fn parse(args: &[String]) -> Result<(Options, Vec<String>), String> {
        let mut options = Options::default();
        let mut positional = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--root" => {
                    options.root = PathBuf::from(iter.next().ok_or("--root needs a directory")?);
                }
                "-o" | "--output" => {
                    options.output =
                        Some(PathBuf::from(iter.next().ok_or("-o needs an output path")?));
                }
                "--unit" => {
                    let name = iter.next().ok_or("--unit needs a unit kind")?;
                    options.unit = UnitKind::parse(name).ok_or_else(|| {
                        format!("unknown unit kind '{name}' (expected common, package, env or sketch)")
                    })?;
                }
                flag if flag.starts_with('-') => return Err(format!("unknown option '{flag}'")),
                _ => positional.push(arg.clone()),
            }
        }
        Ok((options, positional))
    }
}

/// Diagnostics to render against the file they point into.
#[derive(Debug)]
pub struct Failure {
    pub path: String,
    pub source: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Failure {
    pub fn new(path: impl Into<String>, source: Option<String>, diagnostics: Vec<Diagnostic>) -> Self {
        Failure {
            path: path.into(),
            source,
            diagnostics,
        }
    }

    /// Render to stderr, honouring `NO_COLOR`.
    pub fn report(&self) {
        let mode = if std::env::var_os("NO_COLOR").is_some() {
            ColorMode::Never
        } else {
            ColorMode::Auto
        };
        let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
        let mut emitter = TerminalEmitter::with_color_mode(std::io::stderr(), mode, is_tty)
            .with_file_path(&self.path);
        if let Some(source) = &self.source {
            emitter = emitter.with_source(source);
        }
        emitter.emit_all(&self.diagnostics);
        emitter.emit_summary(self.diagnostics.len());
        emitter.flush();
    }
}

/// Read a file named on the command line.
pub(crate) fn read_file(path: &str) -> Result<String, Failure> {
    read_source(Path::new(path), "file", path)
        .map_err(|e| Failure::new(path, None, vec![e.into()]))
}

/// Space-separated uppercase hex.
pub(crate) fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02X}");
    }
    out
}
