//! `jsonq` CLI: query, validate, and inspect JSON from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Evaluate an expression against JSON on stdin
//! echo '{"a":{"b":[10,20,30]}}' | jsonq query 'a.b[1]'
//!
//! # Several expressions against one file, pretty-printed
//! jsonq query -i data.json --pretty 'a.b' 'size(a.b)' 'max(a.b[0], a.b[2])'
//!
//! # Validate a document strictly and print it canonically
//! jsonq check -i data.json --reject-duplicate-keys
//!
//! # Show how an expression parses
//! jsonq ast 'max(a.b[0], 10)'
//! ```
//!
//! Logging goes to stderr. `RUST_LOG` takes precedence; otherwise `--verbose`
//! selects `debug` and the default is `warn`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jsonq_core::options::DEFAULT_MAX_DEPTH;
use jsonq_core::{DecodeOptions, DuplicateKeys, Value};
use std::io::{self, Read};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "jsonq",
    version,
    about = "Query JSON documents with path expressions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder, parser, and evaluator activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one or more expressions against a JSON document
    Query {
        /// Expressions such as `a.b[1]` or `max(a.b[0], 10)`
        #[arg(required = true)]
        expressions: Vec<String>,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print results with indentation
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        decode: DecodeArgs,
    },
    /// Validate a JSON document and print it canonically
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print the document with indentation
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        decode: DecodeArgs,
    },
    /// Print the syntax tree of an expression
    Ast {
        /// Expression to parse
        expression: String,
    },
}

#[derive(Args)]
struct DecodeArgs {
    /// Fail on objects that repeat a key instead of keeping the last value
    #[arg(long)]
    reject_duplicate_keys: bool,
    /// Maximum nesting depth of arrays and objects
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl DecodeArgs {
    fn options(&self) -> DecodeOptions {
        let policy = if self.reject_duplicate_keys {
            DuplicateKeys::Reject
        } else {
            DuplicateKeys::LastWins
        };
        DecodeOptions::default()
            .duplicate_keys(policy)
            .max_depth(self.max_depth)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Query {
            expressions,
            input,
            pretty,
            decode,
        } => {
            let document = load_document(input.as_deref(), &decode)?;
            let mut failures = 0usize;
            for expression in &expressions {
                match evaluate_one(expression, &document) {
                    Ok(value) => println!("{}", render(&value, pretty)),
                    Err(e) => {
                        failures += 1;
                        eprintln!("error: {expression}: {e:#}");
                    }
                }
            }
            if failures > 0 {
                anyhow::bail!(
                    "{} of {} expression(s) failed",
                    failures,
                    expressions.len()
                );
            }
        }
        Commands::Check {
            input,
            pretty,
            decode,
        } => {
            let document = load_document(input.as_deref(), &decode)?;
            println!("{}", render(&document, pretty));
        }
        Commands::Ast { expression } => {
            let ast = jsonq_core::parse_expression(&expression)
                .with_context(|| format!("Failed to parse expression: {expression}"))?;
            debug!(nodes = ast.node_count(), "parsed expression");
            println!("{ast}");
            println!("{ast:#?}");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_document(path: Option<&str>, args: &DecodeArgs) -> Result<Value> {
    let text = read_input(path)?;
    let source = path.unwrap_or("<stdin>");
    jsonq_core::decode_with(&text, &args.options())
        .with_context(|| format!("Failed to parse JSON from {source}"))
}

fn evaluate_one(expression: &str, document: &Value) -> Result<Value> {
    let ast = jsonq_core::parse_expression(expression)?;
    let value = jsonq_core::evaluate(&ast, document)?;
    Ok(value.into_owned())
}

fn render(value: &Value, pretty: bool) -> String {
    if pretty {
        jsonq_core::encode_pretty(value)
    } else {
        jsonq_core::encode(value)
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
