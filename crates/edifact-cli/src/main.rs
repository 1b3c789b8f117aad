//! # edifact-cli
//!
//! Command line interface for tokenizing and validating EDIFACT
//! interchange files against EDMD message specifications.

use std::collections::HashMap;
use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use edifact_parse::tokenize;
use edifact_query::{Navigator, NestedPart};
use edifact_spec::{GroupSpecNode, MessageSpecParser, MsgSpecNode, SegSpecNode};
use edifact_validation::{SegSeqValidator, ValidationConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliExitCode {
    Success = 0,
    Invalid = 1,
    Errors = 2,
}

impl CliExitCode {
    fn as_exit_code(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

#[derive(Parser)]
#[command(name = "edifact")]
#[command(about = "EDIFACT interchange validation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize an interchange file and dump the raw message
    Parse {
        /// Input file path
        input: String,

        /// Emit JSON instead of the plain dump
        #[arg(long)]
        json: bool,
    },

    /// Inspect an EDMD message specification file
    Spec {
        /// Message spec file path
        spec_file: String,
    },

    /// Validate an interchange file against a message specification
    Validate {
        /// Input file path
        input: String,

        /// EDMD message spec file path
        #[arg(short, long)]
        spec: String,

        /// Print only the part addressed by this path expression
        /// (e.g. "grp:Group_4[0]/seg:LIN[0]")
        #[arg(short, long)]
        query: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run() {
        Ok(code) => code.as_exit_code(),
        Err(error) => {
            eprintln!("Error: {error:#}");
            CliExitCode::Errors.as_exit_code()
        }
    }
}

fn run() -> anyhow::Result<CliExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { input, json } => run_parse(&input, json),
        Commands::Spec { spec_file } => run_spec(&spec_file),
        Commands::Validate { input, spec, query } => run_validate(&input, &spec, query.as_deref()),
    }
}

fn run_parse(input: &str, json: bool) -> anyhow::Result<CliExitCode> {
    let contents =
        fs::read_to_string(input).with_context(|| format!("reading input file '{input}'"))?;
    let raw = tokenize(&contents).with_context(|| format!("tokenizing '{input}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&raw)?);
    } else {
        print!("{raw}");
    }
    Ok(CliExitCode::Success)
}

fn run_spec(spec_file: &str) -> anyhow::Result<CliExitCode> {
    let parser = MessageSpecParser::new(HashMap::new());
    let spec = parser
        .parse_spec_file(spec_file)
        .with_context(|| format!("parsing message spec '{spec_file}'"))?;

    println!("Message      {} ({})", spec.id, spec.name);
    println!("Version      {}:{}", spec.version, spec.release);
    println!("Agency       {}", spec.contr_agency);
    println!("Revision     {}", spec.revision);
    println!("Date         {}", spec.date);
    println!("Source       {}", spec.source);
    println!();
    print_nodes(&spec.top_level, 0);
    Ok(CliExitCode::Success)
}

fn run_validate(input: &str, spec_file: &str, query: Option<&str>) -> anyhow::Result<CliExitCode> {
    let contents =
        fs::read_to_string(input).with_context(|| format!("reading input file '{input}'"))?;
    let raw = tokenize(&contents).with_context(|| format!("tokenizing '{input}'"))?;

    let parser = MessageSpecParser::new(HashMap::new());
    let spec = parser
        .parse_spec_file(spec_file)
        .with_context(|| format!("parsing message spec '{spec_file}'"))?;
    if !raw.name.is_empty() && raw.name != spec.id {
        tracing::warn!(message = %raw.name, spec = %spec.id, "message type does not match spec");
    }

    // EDMD files carry no element tables, so only the segment sequence
    // is checked here.
    let validator = SegSeqValidator::with_config(
        Arc::new(spec),
        ValidationConfig {
            validate_elements: false,
        },
    );

    let nested = match validator.validate(&raw) {
        Ok(nested) => nested,
        Err(error) => {
            eprintln!("Invalid: {error}");
            return Ok(CliExitCode::Invalid);
        }
    };

    match query {
        Some(path) => {
            let part = Navigator::new()
                .navigate(path, &nested)
                .with_context(|| format!("navigating '{path}'"))?;
            println!("{}", part_to_json(&part)?);
        }
        None => print!("{}", nested.dump()),
    }
    Ok(CliExitCode::Success)
}

fn part_to_json(part: &NestedPart<'_>) -> anyhow::Result<String> {
    let json = match part {
        NestedPart::Seg(seg) => serde_json::to_string_pretty(seg)?,
        NestedPart::Grp(grp) => serde_json::to_string_pretty(grp)?,
        NestedPart::Composite(cmp) => serde_json::to_string_pretty(cmp)?,
    };
    Ok(json)
}

fn print_nodes(nodes: &[MsgSpecNode], indent: usize) {
    let pad = "  ".repeat(indent);
    for node in nodes {
        match node {
            MsgSpecNode::Seg(seg) => {
                println!("{pad}{} {} {}", seg.id(), status(seg), seg.max_repeats);
            }
            MsgSpecNode::Group(grp) => {
                println!(
                    "{pad}{} {} {}",
                    grp.name,
                    group_status(grp),
                    grp.max_repeats
                );
                print_nodes(&grp.children, indent + 1);
            }
        }
    }
}

fn status(node: &SegSpecNode) -> &'static str {
    if node.mandatory {
        "M"
    } else {
        "C"
    }
}

fn group_status(node: &GroupSpecNode) -> &'static str {
    if node.mandatory {
        "M"
    } else {
        "C"
    }
}
