//! ByteLang Compiler CLI

use bytelangc::commands::{
    build_file, check_file, lex_file, parse_file, show_environment, show_package, Failure,
    Options,
};
use bytelangc::init_tracing;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].as_str();
    let (options, positional) = match Options::parse(&args[2..]) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    };

    let result = match command {
        "lex" => lex_file(required(&positional, "lex <file.bls>")),
        "parse" => parse_file(
            required(&positional, "parse <file.bls> [--unit <kind>]"),
            options.unit,
        ),
        "check" => check_file(
            required(&positional, "check <sketch.bls> [--root <dir>]"),
            &options,
        ),
        "build" => build_file(
            required(&positional, "build <sketch.bls> [--root <dir>] [-o <path>]"),
            &options,
        ),
        "package" => show_package(required(&positional, "package <name> [--root <dir>]"), &options),
        "env" => show_environment(required(&positional, "env <name> [--root <dir>]"), &options),
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "version" | "--version" | "-v" => {
            println!("ByteLang Compiler {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    finish(result);
}

/// First positional argument, or exit with the command's usage line.
fn required<'a>(positional: &'a [String], usage: &str) -> &'a str {
    match positional.first() {
        Some(arg) => arg,
        None => {
            eprintln!("Usage: bytelang {usage}");
            std::process::exit(1);
        }
    }
}

fn finish(result: Result<String, Failure>) {
    match result {
        Ok(report) => print!("{report}"),
        Err(failure) => {
            failure.report();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("ByteLang Compiler");
    println!();
    println!("Usage: bytelang <command> [options]");
    println!();
    println!("Commands:");
    println!("  check <sketch.bls>   Compile a sketch and report errors");
    println!("  build <sketch.bls>   Compile a sketch to a byte image");
    println!("  package <name>       Compile a package and list its instructions");
    println!("  env <name>           Compile an environment and list its opcodes");
    println!("  parse <file.bls>     Parse and display statements");
    println!("  lex <file.bls>       Tokenize and display tokens");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --root <dir>         Catalog root with packages/ and envs/ (default: $BYTELANG_ROOT or .)");
    println!("  -o, --output <path>  Write the image of `build` to a file");
    println!("  --unit <kind>        Grammar for `parse`: common, package, env, sketch (default: sketch)");
    println!();
    println!("Environment:");
    println!("  BYTELANG_LOG         Log filter, e.g. bytelang_sema=debug");
    println!("  NO_COLOR             Disable colored diagnostics");
    println!();
    println!("Examples:");
    println!("  bytelang check blink.bls --root firmware/");
    println!("  bytelang build blink.bls --root firmware/ -o blink.bin");
    println!("  bytelang env avr --root firmware/");
}
