// AST (Abstract Syntax Tree) definitions for the teaching-Python interpreter

use rustc_hash::FxHashSet;
use std::rc::Rc;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "** or pow()",
        }
    }
}

/// Comparison operators, chained as in `a < b <= c`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
            CmpOp::Is => "is",
            CmpOp::IsNot => "is not",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,  // -x
    Plus, // +x
    Not,  // not x
}

/// Short-circuiting boolean operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

/// One piece of an f-string: literal text or a `{expr!conv:spec}` field
#[derive(Debug, Clone)]
pub enum FStringPiece {
    Literal(String),
    Field {
        expr: Box<Expr>,
        conversion: Option<char>,
        spec: Option<String>,
    },
}

/// Expressions
#[derive(Debug, Clone)]
pub enum Expr {
    Int(i64, SourceLocation),
    Float(f64, SourceLocation),
    Str(String, SourceLocation),
    FString(Vec<FStringPiece>, SourceLocation),
    Bool(bool, SourceLocation),
    NoneLit(SourceLocation),
    Name(String, SourceLocation),
    List(Vec<Expr>, SourceLocation),
    Tuple(Vec<Expr>, SourceLocation),
    Dict(Vec<(Expr, Expr)>, SourceLocation),
    ListComp {
        element: Box<Expr>,
        target: Target,
        iter: Box<Expr>,
        conditions: Vec<Expr>,
        location: SourceLocation,
    },
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    BoolOp {
        op: BoolOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Compare {
        left: Box<Expr>,
        comparisons: Vec<(CmpOp, Expr)>,
        location: SourceLocation,
    },
    IfExp {
        condition: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
        location: SourceLocation,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        kwargs: Vec<(String, Expr)>,
        location: SourceLocation,
    },
    Attribute {
        object: Box<Expr>,
        name: String,
        location: SourceLocation,
    },
    Subscript {
        object: Box<Expr>,
        index: Box<Expr>,
        location: SourceLocation,
    },
    /// Only valid as the index of a [`Expr::Subscript`]
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this expression
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Int(_, loc)
            | Expr::Float(_, loc)
            | Expr::Str(_, loc)
            | Expr::FString(_, loc)
            | Expr::Bool(_, loc)
            | Expr::NoneLit(loc)
            | Expr::Name(_, loc)
            | Expr::List(_, loc)
            | Expr::Tuple(_, loc)
            | Expr::Dict(_, loc) => *loc,
            Expr::ListComp { location, .. }
            | Expr::BinaryOp { location, .. }
            | Expr::UnaryOp { location, .. }
            | Expr::BoolOp { location, .. }
            | Expr::Compare { location, .. }
            | Expr::IfExp { location, .. }
            | Expr::Call { location, .. }
            | Expr::Attribute { location, .. }
            | Expr::Subscript { location, .. }
            | Expr::Slice { location, .. } => *location,
        }
    }
}

/// Assignment targets (`x`, `x[i]`, `a, b`)
#[derive(Debug, Clone)]
pub enum Target {
    Name(String, SourceLocation),
    Subscript {
        object: Box<Expr>,
        index: Box<Expr>,
        location: SourceLocation,
    },
    Tuple(Vec<Target>, SourceLocation),
}

impl Target {
    pub fn location(&self) -> SourceLocation {
        match self {
            Target::Name(_, loc) | Target::Tuple(_, loc) => *loc,
            Target::Subscript { location, .. } => *location,
        }
    }

    fn collect_names(&self, names: &mut FxHashSet<String>) {
        match self {
            Target::Name(name, _) => {
                names.insert(name.clone());
            }
            Target::Tuple(items, _) => {
                for item in items {
                    item.collect_names(names);
                }
            }
            Target::Subscript { .. } => {}
        }
    }
}

/// Function parameter with an optional default expression
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
}

/// A `def` statement.
///
/// `locals` holds every name bound anywhere in the body (minus `global`
/// declarations); reading one before it is assigned raises `UnboundLocalError`.
#[derive(Debug)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub locals: FxHashSet<String>,
    pub location: SourceLocation,
}

impl FunctionDef {
    pub fn new(
        name: String,
        params: Vec<Param>,
        body: Vec<Stmt>,
        location: SourceLocation,
    ) -> Self {
        let mut locals = FxHashSet::default();
        let mut globals = FxHashSet::default();
        for param in &params {
            locals.insert(param.name.clone());
        }
        collect_bindings(&body, &mut locals, &mut globals);
        for name in &globals {
            locals.remove(name);
        }
        Self {
            name,
            params,
            body,
            locals,
            location,
        }
    }
}

fn collect_bindings(
    body: &[Stmt],
    locals: &mut FxHashSet<String>,
    globals: &mut FxHashSet<String>,
) {
    for stmt in body {
        match stmt {
            Stmt::Assign { targets, .. } => {
                for target in targets {
                    target.collect_names(locals);
                }
            }
            Stmt::AugAssign { target, .. } => target.collect_names(locals),
            Stmt::For { target, body, .. } => {
                target.collect_names(locals);
                collect_bindings(body, locals, globals);
            }
            Stmt::While { body, .. } => collect_bindings(body, locals, globals),
            Stmt::If {
                branches, orelse, ..
            } => {
                for (_, branch) in branches {
                    collect_bindings(branch, locals, globals);
                }
                if let Some(orelse) = orelse {
                    collect_bindings(orelse, locals, globals);
                }
            }
            Stmt::FunctionDef(def) => {
                locals.insert(def.name.clone());
            }
            Stmt::Import { module, alias, .. } => {
                locals.insert(alias.clone().unwrap_or_else(|| module.clone()));
            }
            Stmt::FromImport { names, .. } => {
                for (name, alias) in names {
                    locals.insert(alias.clone().unwrap_or_else(|| name.clone()));
                }
            }
            Stmt::Global { names, .. } => {
                globals.extend(names.iter().cloned());
            }
            Stmt::Del { targets, .. } => {
                for target in targets {
                    target.collect_names(locals);
                }
            }
            Stmt::Expr { .. }
            | Stmt::Return { .. }
            | Stmt::Break { .. }
            | Stmt::Continue { .. }
            | Stmt::Pass { .. }
            | Stmt::Assert { .. } => {}
        }
    }
}

/// Statements
#[derive(Debug, Clone)]
pub enum Stmt {
    Expr {
        expr: Expr,
        location: SourceLocation,
    },
    /// `a = b = value` keeps every target, assigned left to right
    Assign {
        targets: Vec<Target>,
        value: Expr,
        location: SourceLocation,
    },
    AugAssign {
        target: Target,
        op: BinOp,
        value: Expr,
        location: SourceLocation,
    },
    /// `if` / `elif` chain; each branch is `(condition, body)`
    If {
        branches: Vec<(Expr, Vec<Stmt>)>,
        orelse: Option<Vec<Stmt>>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    For {
        target: Target,
        iter: Expr,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    FunctionDef(Rc<FunctionDef>),
    Return {
        value: Option<Expr>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Pass {
        location: SourceLocation,
    },
    Global {
        names: Vec<String>,
        location: SourceLocation,
    },
    Import {
        module: String,
        alias: Option<String>,
        location: SourceLocation,
    },
    FromImport {
        module: String,
        names: Vec<(String, Option<String>)>,
        location: SourceLocation,
    },
    Assert {
        test: Expr,
        message: Option<Expr>,
        location: SourceLocation,
    },
    Del {
        targets: Vec<Target>,
        location: SourceLocation,
    },
}

impl Stmt {
    /// Get the source location of this statement
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::FunctionDef(def) => def.location,
            Stmt::Expr { location, .. }
            | Stmt::Assign { location, .. }
            | Stmt::AugAssign { location, .. }
            | Stmt::If { location, .. }
            | Stmt::While { location, .. }
            | Stmt::For { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::Break { location }
            | Stmt::Continue { location }
            | Stmt::Pass { location }
            | Stmt::Global { location, .. }
            | Stmt::Import { location, .. }
            | Stmt::FromImport { location, .. }
            | Stmt::Assert { location, .. }
            | Stmt::Del { location, .. } => *location,
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_locals_exclude_globals() {
        let loc = SourceLocation::new(1, 1);
        let body = vec![
            Stmt::Global {
                names: vec!["score".to_string()],
                location: loc,
            },
            Stmt::Assign {
                targets: vec![Target::Name("score".to_string(), loc)],
                value: Expr::Int(1, loc),
                location: loc,
            },
            Stmt::Assign {
                targets: vec![Target::Tuple(
                    vec![
                        Target::Name("a".to_string(), loc),
                        Target::Name("b".to_string(), loc),
                    ],
                    loc,
                )],
                value: Expr::Int(1, loc),
                location: loc,
            },
        ];
        let params = vec![Param {
            name: "n".to_string(),
            default: None,
        }];
        let def = FunctionDef::new("f".to_string(), params, body, loc);

        assert!(def.locals.contains("n"));
        assert!(def.locals.contains("a"));
        assert!(def.locals.contains("b"));
        assert!(!def.locals.contains("score"));
    }
}
