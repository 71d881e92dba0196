mod cli;
mod codegen;
mod error;
mod repl;
mod runtime;
mod syntax;

use std::{
    io::{self, BufRead, Write},
    process,
};

use clap::Parser;
use cli::{Cli, Command, OutputFormat};
use error::{ErrorKind, PResult};
use repl::{Reply, Session};
use runtime::{ConsoleSink, Environment, LogSink, TraceSink};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Repl) {
        Command::Eval { expr, bindings } => eval(&expr, &bindings),
        Command::Compile {
            expr,
            output,
            format,
        } => compile(&expr, output.as_deref(), format),
        Command::Repl => run_repl(),
    };

    if let Err(why) = result {
        eprintln!("Error: {why}");
        process::exit(1);
    }
}

fn eval(src: &str, bindings: &[(String, i64)]) -> PResult<()> {
    let compiled = codegen::build(src)?;

    let mut env = Environment::new();
    for (name, value) in bindings {
        env.insert(name, *value);
    }
    let args = env.bind(compiled.variables())?;

    let value = compiled.call(&args, &mut ConsoleSink)?;
    println!("result = {value}");
    Ok(())
}

fn compile(src: &str, output: Option<&std::path::Path>, format: OutputFormat) -> PResult<()> {
    let compiled = codegen::build(src)?;

    match (format, output) {
        (OutputFormat::Wasm, Some(path)) => {
            std::fs::write(path, codegen::emit_wasm(&compiled))?;
        }
        (OutputFormat::Wasm, None) => {
            return Err(ErrorKind::IoError(
                "Binary output needs a file, pass --output".into(),
            ))
        }
        (OutputFormat::Wat, output) => {
            let mut text = String::new();
            for (i, label) in compiled.labels().iter().enumerate() {
                text.push_str(&format!(";; label {i}: {label}\n"));
            }
            text.push_str(&codegen::emit_wat(&compiled)?);

            match output {
                Some(path) => std::fs::write(path, text)?,
                None => println!("{text}"),
            }
        }
    }

    log::info!("compiled `{src}` over {:?}", compiled.variables());
    Ok(())
}

fn run_repl() -> PResult<()> {
    let mut session = Session::new();
    let mut console = ConsoleSink;
    let mut logger = LogSink;
    let mut sink = |label: &str, value: i64| {
        console.trace(label, value);
        logger.trace(label, value);
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };

        match session.handle(&line?, &mut sink) {
            Reply::Silent => (),
            Reply::Message(message) => println!("{message}"),
            Reply::Exit => break,
        }
    }

    Ok(())
}
