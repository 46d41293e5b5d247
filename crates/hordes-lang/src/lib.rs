pub mod ast;
pub mod error;
pub mod hdl_lexer;
pub mod hdl_parser;
pub mod interp;
pub mod schema;
pub mod scope;
pub mod value;

pub use error::{AttrFault, HdlError, NameFault, Pos, ValueFault};
pub use hdl_parser::parse;
pub use interp::{ArrayMethod, Execution, Interpreter, execute};
pub use schema::{
    Array, ArrayRef, HordeRecord, ItemRecord, MapRecord, MonsterRecord, PlayerRecord, Record,
    RecordKind, RecordRef, TypeTag,
};
pub use value::{Symbol, Value};
