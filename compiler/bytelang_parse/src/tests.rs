#![allow(clippy::unwrap_used)]

use super::*;
use bytelang_diagnostic::Diagnostic;
use bytelang_ir::{Expr, ExprKind, Literal, PointerKind, TypeNodeKind};
use pretty_assertions::assert_eq;

fn tokens(source: &str) -> TokenList {
    bytelang_lexer::tokenize(source).unwrap()
}

fn codes(errors: &[Diagnostic]) -> Vec<&'static str> {
    errors.iter().map(|e| e.code.as_str()).collect()
}

#[test]
fn test_common_directives() {
    let program = parse_common(&tokens(
        ".const N = 4\n.struct P { x: f32, y: f32 }\n.macro add(a, b) -> a + b\n.type Buf = [N]u8\n",
    ))
    .unwrap();

    assert_eq!(program.len(), 4);
    let names: Vec<_> = program
        .statements
        .iter()
        .map(|s| s.name().name.as_str())
        .collect();
    assert_eq!(names, vec!["N", "P", "add", "Buf"]);

    match &program.statements[1] {
        CommonDirective::Struct { fields, .. } => {
            let fields: Vec<_> = fields.iter().map(ToString::to_string).collect();
            assert_eq!(fields, vec!["x: f32", "y: f32"]);
        }
        other => panic!("expected struct, got {other:?}"),
    }
    match &program.statements[2] {
        CommonDirective::Macro { params, body, .. } => {
            assert_eq!(params.len(), 2);
            assert_eq!(body.to_string(), "(a + b)");
        }
        other => panic!("expected macro, got {other:?}"),
    }
}

#[test]
fn test_blank_lines_and_comments_skipped() {
    let program = parse_common(&tokens("\n\n# header\n.const a = 1 # trailing\n\n")).unwrap();
    assert_eq!(program.len(), 1);
}

#[test]
fn test_last_statement_may_end_at_eof() {
    let program = parse_common(&tokens(".const a = 1")).unwrap();
    assert_eq!(program.len(), 1);
}

#[test]
fn test_package_instructions() {
    let program = parse_package(&tokens(
        ".inst nop()\n.inst push(value: i16)\n.inst store(dst: *u8, len: u16)\n",
    ))
    .unwrap();

    let shapes: Vec<_> = program
        .statements
        .iter()
        .map(|s| match s {
            PackageStatement::Instruction { name, fields } => (name.name.clone(), fields.len()),
            PackageStatement::Common(_) => panic!("unexpected common directive"),
        })
        .collect();
    assert_eq!(
        shapes,
        vec![
            ("nop".to_string(), 0),
            ("push".to_string(), 1),
            ("store".to_string(), 2)
        ]
    );
}

#[test]
fn test_environment_statements() {
    let program = parse_environment(&tokens(
        ".ptr_prog u16\n.ptr_inst u8\n.ptr_data u16\n.use base\n.use extra { a, b }\n",
    ))
    .unwrap();

    assert_eq!(program.len(), 5);
    assert!(matches!(
        &program.statements[1],
        EnvironmentStatement::SetPointer { kind: PointerKind::Instruction, primitive }
            if primitive.name == "u8"
    ));
    assert!(matches!(
        &program.statements[3],
        EnvironmentStatement::UsePackage { selected: None, .. }
    ));
    match &program.statements[4] {
        EnvironmentStatement::UsePackage {
            package,
            selected: Some(selected),
        } => {
            assert_eq!(package.name, "extra");
            let names: Vec<_> = selected.iter().map(|i| i.name.as_str()).collect();
            assert_eq!(names, vec!["a", "b"]);
        }
        other => panic!("expected use with selection, got {other:?}"),
    }
}

#[test]
fn test_sketch_statements() {
    let program = parse_sketch(&tokens(
        ".env arduino\n.var buf: [2]u8 = {1, 2}\n.mark start\nnop\npush 1 + 2, @twice(N)\n",
    ))
    .unwrap();

    assert_eq!(program.len(), 5);
    assert!(matches!(&program.statements[0], SketchStatement::SelectEnvironment(id) if id.name == "arduino"));
    match &program.statements[1] {
        SketchStatement::Variable { name, ty, value } => {
            assert_eq!(name.name, "buf");
            assert!(matches!(ty.kind, TypeNodeKind::Array { .. }));
            assert!(matches!(value.kind, ExprKind::InitializerList(ref v) if v.len() == 2));
        }
        other => panic!("expected variable, got {other:?}"),
    }
    assert!(matches!(&program.statements[2], SketchStatement::Mark(id) if id.name == "start"));
    match &program.statements[3] {
        SketchStatement::InstructionCall { name, args } => {
            assert_eq!(name.name, "nop");
            assert!(args.is_empty());
        }
        other => panic!("expected call, got {other:?}"),
    }
    match &program.statements[4] {
        SketchStatement::InstructionCall { args, .. } => {
            let args: Vec<_> = args.iter().map(Expr::to_string).collect();
            assert_eq!(args, vec!["(1 + 2)", "@twice(N)"]);
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_unknown_directive_lists_available() {
    let errors = parse_package(&tokens(".env arduino\n")).unwrap_err();
    assert_eq!(codes(&errors), vec!["E1006"]);
    assert!(errors[0].notes[0].contains(".inst"));
    assert!(!errors[0].notes[0].contains(".env"));
}

#[test]
fn test_plain_statement_misplaced_outside_sketch() {
    let errors = parse_package(&tokens("nop\n")).unwrap_err();
    assert_eq!(codes(&errors), vec!["E1008"]);
}

#[test]
fn test_sketch_rejects_leading_literal() {
    let errors = parse_sketch(&tokens("42\n")).unwrap_err();
    assert_eq!(codes(&errors), vec!["E1008"]);
}

#[test]
fn test_missing_statement_terminator() {
    let errors = parse_common(&tokens(".const a = 1 )\n")).unwrap_err();
    assert_eq!(codes(&errors), vec!["E1007"]);
}

#[test]
fn test_every_broken_line_is_reported() {
    let source = ".const = 1\n.const ok = 2\n.struct S { x u8 }\n.bogus\n.const z = )\n";
    let errors = parse_common(&tokens(source)).unwrap_err();
    assert_eq!(codes(&errors), vec!["E1004", "E1001", "E1006", "E1002"]);
}

#[test]
fn test_recovery_keeps_later_statements_parseable() {
    // The error in line one must not swallow line two.
    let source = ".const a = (1\n.const b = 2\n";
    let errors = parse_common(&tokens(source)).unwrap_err();
    assert_eq!(codes(&errors), vec!["E1003"]);
    assert_eq!(errors[0].primary_span(), Some(Span::new(13, 14)));
}

#[test]
fn test_call_argument_errors_accumulate() {
    let errors = parse_sketch(&tokens("push , 1, +\n")).unwrap_err();
    assert_eq!(codes(&errors), vec!["E1002", "E1002"]);
}

#[test]
fn test_call_arguments_need_separator() {
    let errors = parse_sketch(&tokens("push 1 2\n")).unwrap_err();
    assert_eq!(codes(&errors), vec!["E1001"]);
    assert!(errors[0].message.contains("end of statement"));
}

#[test]
fn test_const_value_shapes() {
    let program = parse_common(&tokens(".const s = \"ab\"\n.const c = -'x'\n")).unwrap();
    match &program.statements[0] {
        CommonDirective::Const { value, .. } => {
            assert_eq!(value.kind, ExprKind::Literal(Literal::Str("ab".into())));
        }
        other => panic!("expected const, got {other:?}"),
    }
    match &program.statements[1] {
        CommonDirective::Const { value, .. } => assert_eq!(value.to_string(), "-'x'"),
        other => panic!("expected const, got {other:?}"),
    }
}
