use crate::{
    codegen::{build, CompiledExpr},
    error::PResult,
    runtime::{Environment, TraceSink},
};

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Reply {
    Silent,
    Message(String),
    Exit,
}

/// Caller-held state of the interactive loop: the variable store and the
/// expression most recently accepted.
pub(crate) struct Session {
    env: Environment,
    current: Option<CompiledExpr>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
            current: None,
        }
    }

    /// Handles one input line. Trace records of `do` go to `sink`.
    pub fn handle(&mut self, line: &str, sink: &mut dyn TraceSink) -> Reply {
        let line = line.trim().trim_start_matches('\u{feff}');
        if line.is_empty() {
            return Reply::Silent;
        }

        if has_prefix(line, "expr") {
            let text = line[4..].trim_start();
            if text.is_empty() {
                return Reply::Message("Usage: expr <expression>".into());
            }
            return Reply::Message(self.set_expression(text));
        }

        if has_prefix(line, "set ") {
            return Reply::Message(self.set_variable(&line[4..]));
        }

        if line.eq_ignore_ascii_case("do") {
            return match self.execute(sink) {
                Ok(None) => Reply::Message("No expression set. Use expr <expression> first.".into()),
                Ok(Some(_)) => Reply::Silent,
                Err(why) => Reply::Message(format!("Error: {why}")),
            };
        }

        if line.eq_ignore_ascii_case("exit") {
            return Reply::Exit;
        }

        Reply::Message("Unknown command. Use expr, set, do, or exit.".into())
    }

    fn set_expression(&mut self, text: &str) -> String {
        match build(text) {
            Ok(compiled) => {
                self.current = Some(compiled);
                "Expression accepted.".into()
            }
            Err(why) => {
                self.current = None;
                format!("Error: {why}")
            }
        }
    }

    fn set_variable(&mut self, args: &str) -> String {
        let parts: Vec<&str> = args.split_whitespace().collect();
        let &[name, value] = parts.as_slice() else {
            return "Usage: set <name> <value>".into();
        };

        match value.parse::<i64>() {
            Ok(value) => {
                self.env.insert(name, value);
                format!("Variable {name} set to {value}.")
            }
            Err(_) => "Invalid integer value.".into(),
        }
    }

    fn execute(&self, sink: &mut dyn TraceSink) -> PResult<Option<i64>> {
        let Some(compiled) = &self.current else {
            return Ok(None);
        };

        let args = self.env.bind(compiled.variables())?;
        compiled.call(&args, sink).map(Some)
    }
}

fn has_prefix(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}
