use crate::pattern::Bind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "patsub",
    about = "Template-anchored pattern matching and rewriting",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fill a template by prompting for a value per pattern word
    Fill {
        /// Template file with ${word} placeholders
        template: PathBuf,
    },

    /// Rewrite text by matching one template and rendering another
    Rewrite {
        /// Template matched against the input
        #[arg(long)]
        lhs: String,

        /// Template the matched text is rewritten into
        #[arg(long)]
        rhs: String,

        /// Matching expression for a pattern word (repeatable)
        #[arg(short, long = "bind", value_name = "NAME=EXPR", value_parser = parse_bind)]
        binds: Vec<Bind>,

        /// Require the transformation to be reversible
        #[arg(long)]
        check: bool,

        /// Swap the two templates before rewriting
        #[arg(long)]
        reverse: bool,

        /// Input file, or stdin if omitted
        input: Option<PathBuf>,
    },
}

fn parse_bind(s: &str) -> Result<Bind, String> {
    match s.split_once('=') {
        Some((name, expr)) if !name.is_empty() => Ok(Bind::new(name, expr)),
        _ => Err(format!("expected NAME=EXPR, got '{s}'")),
    }
}
