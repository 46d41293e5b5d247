//! Abstract syntax tree produced by [`crate::hdl_parser`].

use std::fmt;

use crate::error::Pos;
use crate::schema::RecordKind;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub lines: Vec<Line>,
}

/// One declaration or statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Decl(Decl),
    Assign(Assign),
    MethodCall(MethodCall),
    Print(Print),
    For(ForLoop),
    If(IfElse),
}

impl Line {
    pub fn pos(&self) -> Pos {
        match self {
            Line::Decl(d) => d.pos,
            Line::Assign(a) => a.pos,
            Line::MethodCall(m) => m.pos,
            Line::Print(p) => p.pos,
            Line::For(f) => f.pos,
            Line::If(i) => i.pos,
        }
    }
}

/// `Horde h;` or `Horde hs[];`
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub kind: RecordKind,
    pub name: String,
    /// `Some(0)` for an array declaration.
    pub dimension: Option<usize>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub target: Path,
    pub value: Expr,
    pub pos: Pos,
}

/// A dotted, optionally indexed access path such as `m.hordes[0].x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// The variable the path starts from.
    pub root: Segment,
    /// Attribute steps, outermost first.
    pub attrs: Vec<Segment>,
}

impl Path {
    pub fn pos(&self) -> Pos {
        self.root.pos
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for attr in &self.attrs {
            write!(f, ".{attr}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    pub index: Option<i64>,
    pub pos: Pos,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{i}]", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// `path.method(args);`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub target: Path,
    pub method: String,
    pub method_pos: Pos,
    pub args: Vec<Expr>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Print {
    pub args: Vec<Expr>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub binding: String,
    pub source: ForSource,
    pub body: Vec<Line>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForSource {
    /// Half-open integer range `(start, end)`.
    Range { start: i64, end: i64 },
    /// Elements of an array-typed path.
    Elements(Path),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfElse {
    pub cond: Cond,
    pub then_block: Vec<Line>,
    pub else_block: Option<Vec<Line>>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    Compare {
        lhs: Expr,
        op: RelOp,
        rhs: Expr,
        pos: Pos,
    },
    Not(Box<Cond>),
    And(Box<Cond>, Box<Cond>),
    Or(Box<Cond>, Box<Cond>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl RelOp {
    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
            RelOp::Lt => "<",
            RelOp::Le => "<=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64, Pos),
    Real(f64, Pos),
    Str(String, Pos),
    Path(Path),
    Binary {
        op: ArithOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        pos: Pos,
    },
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Int(_, pos) | Expr::Real(_, pos) | Expr::Str(_, pos) => *pos,
            Expr::Path(path) => path.pos(),
            Expr::Binary { pos, .. } => *pos,
        }
    }
}
