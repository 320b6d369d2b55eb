//! Syntax tree for ByteLang compilation units.
//!
//! Every unit kind shares the [`CommonDirective`] set and wraps it in its own
//! statement enum. Nodes own their children; there is no arena.

use std::fmt;

use crate::Span;

/// An identifier occurrence with its location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Arithmetic operator, used both as prefix and as infix operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
        }
    }

    /// Infix binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Plus | Operator::Minus => 1,
            Operator::Star | Operator::Slash => 2,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Literal value attached by the lexer.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Char(char),
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{n}"),
            Literal::Float(x) => write!(f, "{x:?}"),
            Literal::Char(c) => write!(f, "'{c}'"),
            Literal::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// Reference to a named value.
    Ident(String),
    Literal(Literal),
    Unary {
        op: Operator,
        operand: Box<Expr>,
    },
    Binary {
        op: Operator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `@name(args)`
    MacroCall { name: Ident, args: Vec<Expr> },
    /// `{ a, b, ... }`
    InitializerList(Vec<Expr>),
}

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        Expr::new(ExprKind::Ident(name.into()), span)
    }

    pub fn literal(literal: Literal, span: Span) -> Self {
        Expr::new(ExprKind::Literal(literal), span)
    }

    pub fn unary(op: Operator, operand: Expr, span: Span) -> Self {
        Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    /// Binary node spanning both operands.
    pub fn binary(op: Operator, left: Expr, right: Expr) -> Self {
        let span = left.span.merge(right.span);
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Ident(name) => f.write_str(name),
            ExprKind::Literal(lit) => write!(f, "{lit}"),
            ExprKind::Unary { op, operand } => write!(f, "{op}{operand}"),
            ExprKind::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
            ExprKind::MacroCall { name, args } => {
                write!(f, "@{name}(")?;
                write_comma_separated(f, args)?;
                f.write_str(")")
            }
            ExprKind::InitializerList(items) => {
                f.write_str("{")?;
                write_comma_separated(f, items)?;
                f.write_str("}")
            }
        }
    }
}

fn write_comma_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum TypeNodeKind {
    /// Named type: a primitive, struct or alias.
    Pure(String),
    /// `*T`
    Pointer(Box<TypeNode>),
    /// `[len]T`
    Array {
        length: Box<Expr>,
        element: Box<TypeNode>,
    },
}

/// Type as written in source, before resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeNode {
    pub kind: TypeNodeKind,
    pub span: Span,
}

impl TypeNode {
    pub fn new(kind: TypeNodeKind, span: Span) -> Self {
        TypeNode { kind, span }
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeNodeKind::Pure(name) => f.write_str(name),
            TypeNodeKind::Pointer(inner) => write!(f, "*{inner}"),
            TypeNodeKind::Array { length, element } => write!(f, "[{length}]{element}"),
        }
    }
}

/// `name: type` pair used by structs and instruction signatures.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: Ident,
    pub ty: TypeNode,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Directives available in every unit kind.
#[derive(Clone, Debug, PartialEq)]
pub enum CommonDirective {
    /// `.const name = expr`
    Const { name: Ident, value: Expr },
    /// `.struct name { field: type, ... }`
    Struct { name: Ident, fields: Vec<Field> },
    /// `.macro name(a, b) -> expr`
    Macro {
        name: Ident,
        params: Vec<Ident>,
        body: Expr,
    },
    /// `.type name = type`
    TypeAlias { name: Ident, ty: TypeNode },
}

impl CommonDirective {
    /// The name this directive defines.
    pub fn name(&self) -> &Ident {
        match self {
            CommonDirective::Const { name, .. }
            | CommonDirective::Struct { name, .. }
            | CommonDirective::Macro { name, .. }
            | CommonDirective::TypeAlias { name, .. } => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PackageStatement {
    Common(CommonDirective),
    /// `.inst name(field: type, ...)`
    Instruction { name: Ident, fields: Vec<Field> },
}

/// Which pointer slot a `.ptr_*` directive sets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Program,
    Instruction,
    Data,
}

impl PointerKind {
    pub const ALL: [PointerKind; 3] = [
        PointerKind::Program,
        PointerKind::Instruction,
        PointerKind::Data,
    ];

    /// The directive that sets this slot.
    pub fn directive(self) -> &'static str {
        match self {
            PointerKind::Program => "ptr_prog",
            PointerKind::Instruction => "ptr_inst",
            PointerKind::Data => "ptr_data",
        }
    }
}

impl fmt::Display for PointerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerKind::Program => f.write_str("program"),
            PointerKind::Instruction => f.write_str("instruction"),
            PointerKind::Data => f.write_str("data"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EnvironmentStatement {
    Common(CommonDirective),
    /// `.use package` or `.use package { a, b }`
    UsePackage {
        package: Ident,
        selected: Option<Vec<Ident>>,
    },
    /// `.ptr_prog u16` and friends.
    SetPointer { kind: PointerKind, primitive: Ident },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SketchStatement {
    Common(CommonDirective),
    /// `.env name`
    SelectEnvironment(Ident),
    /// `.mark name`
    Mark(Ident),
    /// `.var name: type = expr`
    Variable {
        name: Ident,
        ty: TypeNode,
        value: Expr,
    },
    /// `name arg, arg, ...`
    InstructionCall { name: Ident, args: Vec<Expr> },
}

impl From<CommonDirective> for PackageStatement {
    fn from(directive: CommonDirective) -> Self {
        PackageStatement::Common(directive)
    }
}

impl From<CommonDirective> for EnvironmentStatement {
    fn from(directive: CommonDirective) -> Self {
        EnvironmentStatement::Common(directive)
    }
}

impl From<CommonDirective> for SketchStatement {
    fn from(directive: CommonDirective) -> Self {
        SketchStatement::Common(directive)
    }
}

impl fmt::Display for CommonDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommonDirective::Const { name, value } => write!(f, ".const {name} = {value}"),
            CommonDirective::Struct { name, fields } => {
                write!(f, ".struct {name} {{ ")?;
                write_comma_separated(f, fields)?;
                f.write_str(" }")
            }
            CommonDirective::Macro { name, params, body } => {
                write!(f, ".macro {name}(")?;
                write_comma_separated(f, params)?;
                write!(f, ") -> {body}")
            }
            CommonDirective::TypeAlias { name, ty } => write!(f, ".type {name} = {ty}"),
        }
    }
}

impl fmt::Display for PackageStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageStatement::Common(directive) => write!(f, "{directive}"),
            PackageStatement::Instruction { name, fields } => {
                write!(f, ".inst {name}(")?;
                write_comma_separated(f, fields)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for EnvironmentStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentStatement::Common(directive) => write!(f, "{directive}"),
            EnvironmentStatement::UsePackage { package, selected } => {
                write!(f, ".use {package}")?;
                if let Some(selected) = selected {
                    f.write_str(" { ")?;
                    write_comma_separated(f, selected)?;
                    f.write_str(" }")?;
                }
                Ok(())
            }
            EnvironmentStatement::SetPointer { kind, primitive } => {
                write!(f, ".{} {primitive}", kind.directive())
            }
        }
    }
}

impl fmt::Display for SketchStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchStatement::Common(directive) => write!(f, "{directive}"),
            SketchStatement::SelectEnvironment(name) => write!(f, ".env {name}"),
            SketchStatement::Mark(name) => write!(f, ".mark {name}"),
            SketchStatement::Variable { name, ty, value } => {
                write!(f, ".var {name}: {ty} = {value}")
            }
            SketchStatement::InstructionCall { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    f.write_str(" ")?;
                    write_comma_separated(f, args)?;
                }
                Ok(())
            }
        }
    }
}

/// A parsed compilation unit: statements in source order.
#[derive(Clone, Debug, PartialEq)]
pub struct Program<S> {
    pub statements: Vec<S>,
}

impl<S> Program<S> {
    pub fn new(statements: Vec<S>) -> Self {
        Program { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl<S> Default for Program<S> {
    fn default() -> Self {
        Program {
            statements: Vec::new(),
        }
    }
}
