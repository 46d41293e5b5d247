//! The scope environment: a stack of frames searched innermost first.
//!
//! The bottom frame is the global scope and lives as long as the
//! environment. Record frames are pushed while a dotted path walks into a
//! record, so that the record's fields resolve as names of the top frame.

use crate::schema::{RecordRef, TypeTag};
use crate::value::{Symbol, Value};

#[derive(Debug)]
enum Frame {
    Names(Vec<Symbol>),
    Fields(RecordRef),
}

/// A name resolved in the top frame.
#[derive(Debug, Clone)]
pub struct Binding {
    pub ty: TypeTag,
    pub value: Value,
}

#[derive(Debug)]
pub struct Env {
    frames: Vec<Frame>,
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Env {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::Names(Vec::new())],
        }
    }

    /// Number of frames above the global scope.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn push(&mut self) {
        log::trace!("push scope (depth {})", self.depth() + 1);
        self.frames.push(Frame::Names(Vec::new()));
    }

    pub fn push_record(&mut self, record: RecordRef) {
        self.frames.push(Frame::Fields(record));
    }

    /// Drop the top frame. The global scope is never removed; popping it
    /// returns false and leaves the environment unchanged.
    pub fn pop(&mut self) -> bool {
        if self.frames.len() == 1 {
            log::warn!("attempt to pop the global scope");
            return false;
        }
        self.frames.pop();
        true
    }

    /// True when `name` is bound in the top frame.
    pub fn declared_here(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Bind a new symbol in the top frame. Gives the symbol back when the top
    /// frame is a record, which cannot grow new fields.
    pub fn add(&mut self, symbol: Symbol) -> Result<(), Symbol> {
        match self.frames.last_mut() {
            Some(Frame::Names(symbols)) => {
                symbols.push(symbol);
                Ok(())
            }
            _ => Err(symbol),
        }
    }

    /// Look `name` up in the top frame only.
    pub fn get(&self, name: &str) -> Option<Binding> {
        match self.frames.last()? {
            Frame::Names(symbols) => symbols.iter().find(|s| s.name == name).map(|s| Binding {
                ty: s.ty,
                value: s.value.clone(),
            }),
            Frame::Fields(record) => {
                let record = record.borrow();
                let ty = record.kind().field_type(name)?;
                let value = record.load(name)?;
                Some(Binding { ty, value })
            }
        }
    }

    /// Overwrite `name` in the top frame. False when it is not bound there.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.frames.last_mut() {
            Some(Frame::Names(symbols)) => match symbols.iter_mut().find(|s| s.name == name) {
                Some(symbol) => {
                    symbol.value = value;
                    true
                }
                None => false,
            },
            Some(Frame::Fields(record)) => record.borrow_mut().store(name, value),
            None => false,
        }
    }

    /// Find `name` searching from the innermost name frame outwards. Returns
    /// the frame index with the symbol so that it can be written back.
    pub fn search(&self, name: &str) -> Option<(usize, &Symbol)> {
        self.frames
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, frame)| match frame {
                Frame::Names(symbols) => symbols
                    .iter()
                    .find(|s| s.name == name)
                    .map(|symbol| (index, symbol)),
                Frame::Fields(_) => None,
            })
    }

    pub fn symbol_mut(&mut self, frame: usize, name: &str) -> Option<&mut Symbol> {
        match self.frames.get_mut(frame)? {
            Frame::Names(symbols) => symbols.iter_mut().find(|s| s.name == name),
            Frame::Fields(_) => None,
        }
    }

    pub fn into_globals(mut self) -> Vec<Symbol> {
        self.frames.truncate(1);
        match self.frames.pop() {
            Some(Frame::Names(symbols)) => symbols,
            _ => Vec::new(),
        }
    }
}
