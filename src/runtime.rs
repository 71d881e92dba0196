pub(crate) mod builtin;
pub(crate) mod env;
pub(crate) mod eval;

pub(crate) use builtin::{ConsoleSink, LogSink, TraceSink};
pub(crate) use env::Environment;
