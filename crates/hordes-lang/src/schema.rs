//! The fixed record schema of the language.
//!
//! Every record kind is a plain struct generated from the table at the bottom
//! of this file; the interpreter reaches fields by their source name through
//! [`Record::load`] and [`Record::store`], the generator reads the typed
//! fields directly.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use strum::{Display, EnumCount, EnumIter, EnumString};

use crate::value::Value;

/// Record type names, which double as the declarable types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, EnumCount)]
pub enum RecordKind {
    Map,
    Horde,
    Monster,
    Item,
    Player,
}

/// Nominal type of a symbol or record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    Real,
    Str,
    Record(RecordKind),
    Array(RecordKind),
}

impl TypeTag {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Real)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Real => f.write_str("real"),
            Self::Str => f.write_str("string"),
            Self::Record(kind) => write!(f, "{kind}"),
            Self::Array(kind) => write!(f, "{kind}[]"),
        }
    }
}

pub type RecordRef = Rc<RefCell<Record>>;
pub type ArrayRef = Rc<RefCell<Array>>;

/// A growable sequence of records of one kind.
#[derive(Debug)]
pub struct Array {
    pub elem: RecordKind,
    pub items: Vec<RecordRef>,
}

impl Array {
    pub fn new(elem: RecordKind) -> Self {
        Self {
            elem,
            items: Vec::new(),
        }
    }

    pub fn shared(elem: RecordKind) -> ArrayRef {
        Rc::new(RefCell::new(Self::new(elem)))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Conversion between a typed struct field and a runtime [`Value`].
trait Slot {
    fn load(&self) -> Value;
    /// Returns false when `value` has the wrong shape for this slot.
    fn store(&mut self, value: Value) -> bool;
}

impl Slot for i64 {
    fn load(&self) -> Value {
        Value::Int(*self)
    }

    fn store(&mut self, value: Value) -> bool {
        match value {
            Value::Int(v) => {
                *self = v;
                true
            }
            _ => false,
        }
    }
}

impl Slot for f64 {
    fn load(&self) -> Value {
        Value::Real(*self)
    }

    fn store(&mut self, value: Value) -> bool {
        match value {
            Value::Real(v) => {
                *self = v;
                true
            }
            _ => false,
        }
    }
}

impl Slot for String {
    fn load(&self) -> Value {
        Value::Str(self.clone())
    }

    fn store(&mut self, value: Value) -> bool {
        match value {
            Value::Str(v) => {
                *self = v;
                true
            }
            _ => false,
        }
    }
}

impl Slot for Option<RecordRef> {
    fn load(&self) -> Value {
        match self {
            Some(record) => Value::Record(Rc::clone(record)),
            None => Value::Unset,
        }
    }

    fn store(&mut self, value: Value) -> bool {
        match value {
            Value::Record(record) => {
                *self = Some(record);
                true
            }
            Value::Unset => {
                *self = None;
                true
            }
            _ => false,
        }
    }
}

impl Slot for ArrayRef {
    fn load(&self) -> Value {
        Value::Array(Rc::clone(self))
    }

    fn store(&mut self, value: Value) -> bool {
        match value {
            Value::Array(array) => {
                *self = array;
                true
            }
            _ => false,
        }
    }
}

macro_rules! slot_type {
    (int) => { i64 };
    (real) => { f64 };
    (string) => { String };
    (record $kind:ident) => { Option<RecordRef> };
    (array $kind:ident) => { ArrayRef };
}

macro_rules! slot_tag {
    (int) => { TypeTag::Int };
    (real) => { TypeTag::Real };
    (string) => { TypeTag::Str };
    (record $kind:ident) => { TypeTag::Record(RecordKind::$kind) };
    (array $kind:ident) => { TypeTag::Array(RecordKind::$kind) };
}

macro_rules! slot_zero {
    (int) => { 0 };
    (real) => { 0.0 };
    (string) => { String::new() };
    (record $kind:ident) => { None };
    (array $kind:ident) => { Array::shared(RecordKind::$kind) };
}

macro_rules! records {
    ($(
        $(#[$meta:meta])*
        $kind:ident => $record:ident {
            $( $src:literal => $field:ident : $slot:ident $( ( $elem:ident ) )? ),* $(,)?
        }
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug)]
            pub struct $record {
                $( pub $field: slot_type!($slot $($elem)?), )*
            }

            impl $record {
                /// Source field names and their types, in declaration order.
                pub const SCHEMA: &'static [(&'static str, TypeTag)] = &[
                    $( ($src, slot_tag!($slot $($elem)?)), )*
                ];

                fn new() -> Self {
                    Self {
                        $( $field: slot_zero!($slot $($elem)?), )*
                    }
                }

                fn load(&self, field: &str) -> Option<Value> {
                    match field {
                        $( $src => Some(Slot::load(&self.$field)), )*
                        _ => None,
                    }
                }

                fn store(&mut self, field: &str, value: Value) -> bool {
                    match field {
                        $( $src => Slot::store(&mut self.$field, value), )*
                        _ => false,
                    }
                }
            }
        )*

        /// A record of any kind, as held behind a [`RecordRef`].
        #[derive(Debug)]
        pub enum Record {
            $( $kind($record), )*
        }

        impl Record {
            /// A record with every scalar at its zero value and every array empty.
            pub fn new(kind: RecordKind) -> Self {
                match kind {
                    $( RecordKind::$kind => Self::$kind($record::new()), )*
                }
            }

            pub fn kind(&self) -> RecordKind {
                match self {
                    $( Self::$kind(_) => RecordKind::$kind, )*
                }
            }

            /// Read a field by its source name.
            pub fn load(&self, field: &str) -> Option<Value> {
                match self {
                    $( Self::$kind(record) => record.load(field), )*
                }
            }

            /// Write a field by its source name. False when the field does not
            /// exist or the value has the wrong shape.
            pub fn store(&mut self, field: &str, value: Value) -> bool {
                match self {
                    $( Self::$kind(record) => record.store(field, value), )*
                }
            }
        }

        impl RecordKind {
            pub fn schema(self) -> &'static [(&'static str, TypeTag)] {
                match self {
                    $( Self::$kind => $record::SCHEMA, )*
                }
            }
        }
    };
}

records! {
    /// A playable level: arena dimensions, archetype and content.
    Map => MapRecord {
        "name" => name: string,
        "introMessage" => intro_message: string,
        "difficult" => difficult: string,
        "width" => width: int,
        "height" => height: int,
        "type" => kind: string,
        "next" => next: record(Map),
        "players" => players: array(Player),
        "hordes" => hordes: array(Horde),
        "items" => items: array(Item),
    }

    /// One wave of monsters.
    Horde => HordeRecord {
        "id" => id: string,
        "x" => x: int,
        "y" => y: int,
        "delay" => delay: real,
        "fireX" => fire_x: int,
        "fireY" => fire_y: int,
        "message" => message: string,
        "next" => next: record(Horde),
        "monsters" => monsters: array(Monster),
    }

    Monster => MonsterRecord {
        "id" => id: string,
        "type" => kind: string,
    }

    Item => ItemRecord {
        "type" => kind: string,
        "subType" => sub_type: string,
        "size" => size: string,
        "x" => x: int,
        "y" => y: int,
    }

    Player => PlayerRecord {
        "x" => x: int,
        "y" => y: int,
    }
}

impl RecordKind {
    pub fn field_type(self, field: &str) -> Option<TypeTag> {
        self.schema()
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, tag)| *tag)
    }
}

/// Allocate a fresh shared record.
pub fn new_record(kind: RecordKind) -> RecordRef {
    Rc::new(RefCell::new(Record::new(kind)))
}
