#[derive(clap::Parser, Debug)]
#[clap(about, long_about = None)]
pub(crate) struct Cli {
    /// Defaults to the interactive loop
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub(crate) enum OutputFormat {
    Wasm,
    Wat,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Command {
    /// Compile an expression and evaluate it once, tracing every operator
    Eval {
        expr: String,

        /// Bind a variable, e.g. `-s x=4`
        #[arg(short = 's', long = "set", value_parser = parse_binding)]
        bindings: Vec<(String, i64)>,
    },

    /// Compile an expression to a WASM module
    Compile {
        expr: String,

        /// The file name of the generated output (WAT goes to stdout if omitted)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,

        /// Specifies the output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Wat)]
        format: OutputFormat,
    },

    /// Interactive loop: `expr <text>`, `set <name> <value>`, `do`, `exit`
    Repl,
}

fn parse_binding(s: &str) -> Result<(String, i64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, found `{s}`"))?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|why| format!("invalid integer `{value}`: {why}"))?;
    Ok((name.trim().to_string(), value))
}

#[cfg(test)]
mod test {
    use super::{parse_binding, Cli, Command};
    use clap::Parser;

    #[test]
    fn binding() {
        assert_eq!(parse_binding("x=4"), Ok(("x".to_string(), 4)));
        assert_eq!(parse_binding(" Y = -2 "), Ok(("Y".to_string(), -2)));
        assert!(parse_binding("x").is_err());
        assert!(parse_binding("x=abc").is_err());
    }

    #[test]
    fn eval_args() {
        let cli = Cli::try_parse_from(["exprc", "eval", "x*x+y", "-s", "x=4", "--set", "y=1"]).unwrap();
        match cli.command {
            Some(Command::Eval { expr, bindings }) => {
                assert_eq!(expr, "x*x+y");
                assert_eq!(bindings, vec![("x".to_string(), 4), ("y".to_string(), 1)]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn no_subcommand() {
        let cli = Cli::try_parse_from(["exprc"]).unwrap();
        assert!(cli.command.is_none());
    }
}
