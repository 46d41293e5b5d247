//! Error taxonomy shared by every stage of the front end.

use std::fmt;

/// A 1-based source position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Why a name lookup or declaration failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFault {
    Undeclared,
    AlreadyDeclared,
}

impl fmt::Display for NameFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undeclared => f.write_str("is not declared"),
            Self::AlreadyDeclared => f.write_str("is already declared"),
        }
    }
}

/// What kind of member lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrFault {
    /// The record has no field with that name.
    Field,
    /// The array has no method with that name.
    Method,
    /// The path walks through a record reference that was never assigned.
    Unset,
}

impl fmt::Display for AttrFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => f.write_str("no such attribute"),
            Self::Method => f.write_str("no such method"),
            Self::Unset => f.write_str("attribute of an unset record"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFault {
    DivisionByZero,
    NotInList,
}

impl fmt::Display for ValueFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => f.write_str("division by zero"),
            Self::NotInList => f.write_str("argument not in list"),
        }
    }
}

/// Every failure the front end can report. Each one aborts the program.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HdlError {
    #[error("{pos}: lexical error: unexpected character {ch:?}")]
    Lex { ch: char, pos: Pos },

    #[error("{pos}: syntax error: unexpected {kind} '{value}'")]
    Syntax {
        kind: &'static str,
        value: String,
        pos: Pos,
    },

    #[error("{pos}: type error: {msg}")]
    Type { msg: String, pos: Pos },

    #[error("{pos}: attribute error: {fault} '{name}'")]
    Attr {
        name: String,
        fault: AttrFault,
        pos: Pos,
    },

    #[error("{pos}: index error: index {index} out of range for length {len}")]
    Index { index: i64, len: usize, pos: Pos },

    #[error("{pos}: name error: '{name}' {fault}")]
    Name {
        name: String,
        fault: NameFault,
        pos: Pos,
    },

    #[error("{pos}: value error: {fault}")]
    Value { fault: ValueFault, pos: Pos },
}

impl HdlError {
    pub fn pos(&self) -> Pos {
        match self {
            Self::Lex { pos, .. }
            | Self::Syntax { pos, .. }
            | Self::Type { pos, .. }
            | Self::Attr { pos, .. }
            | Self::Index { pos, .. }
            | Self::Name { pos, .. }
            | Self::Value { pos, .. } => *pos,
        }
    }

    /// True for `AttrError`s raised while resolving a method name.
    pub fn is_method_lookup(&self) -> bool {
        matches!(
            self,
            Self::Attr {
                fault: AttrFault::Method,
                ..
            }
        )
    }
}
