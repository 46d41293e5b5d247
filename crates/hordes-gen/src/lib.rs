//! Map generation for evaluated Hordes programs.
//!
//! [`compile`] runs a program and renders every map it declares. A map that
//! cannot be generated is reported on its own without stopping the others.

pub mod arena;
pub mod brush;
pub mod entity;
pub mod horde;
pub mod input;
pub mod item;
pub mod map;
pub mod map_writer;
pub mod monster;
pub mod player;
pub mod units;

use hordes_lang::HdlError;

pub use input::{MapInput, snapshot};
pub use map::{GenError, Map, generate};
pub use map_writer::count_entities;

/// A program that failed before any map could be considered.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Hdl(#[from] HdlError),
}

/// The generated text of one map, or why it has none.
#[derive(Debug)]
pub struct MapOutcome {
    pub name: String,
    pub result: Result<String, GenError>,
}

#[derive(Debug)]
pub struct Compilation {
    pub maps: Vec<MapOutcome>,
    /// Lines produced by `print` statements.
    pub output: Vec<String>,
}

impl Compilation {
    pub fn generated(&self) -> impl Iterator<Item = (&str, &str)> {
        self.maps.iter().filter_map(|outcome| match &outcome.result {
            Ok(text) => Some((outcome.name.as_str(), text.as_str())),
            Err(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &GenError> {
        self.maps.iter().filter_map(|outcome| outcome.result.as_ref().err())
    }
}

pub fn compile(source: &str) -> Result<Compilation, CompileError> {
    let execution = hordes_lang::execute(source)?;
    let inputs = snapshot(&execution);
    if inputs.is_empty() {
        log::warn!("program declares no maps");
    }
    let maps = inputs
        .iter()
        .map(|input| MapOutcome {
            name: input.name.clone(),
            result: generate(input).map(|map| map.to_string()),
        })
        .collect();
    Ok(Compilation {
        maps,
        output: execution.output,
    })
}
