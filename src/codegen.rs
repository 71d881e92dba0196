mod compile;
mod wasm;

pub(crate) use compile::{build, CompiledExpr, Instruction};
pub(crate) use wasm::{emit_wasm, emit_wat};
