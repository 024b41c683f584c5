use anyhow::Context;
use clap::Parser;
use patsub::cli::{Cli, Command};
use patsub::output::Output;
use patsub::{Bind, Binds, Pattern, Reversible, Transform};
use std::io::{Read, Write};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let use_color = !cli.no_color && atty::is(atty::Stream::Stderr);

    match cli.command {
        Command::Fill { template } => fill(&template, use_color),
        Command::Rewrite {
            lhs,
            rhs,
            binds,
            check,
            reverse,
            input,
        } => rewrite(&lhs, &rhs, &binds, check, reverse, input.as_deref()),
    }
}

fn fill(path: &Path, use_color: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading template '{}'", path.display()))?;
    let pattern = Pattern::parse(&text, &[]).context("parsing template")?;

    let mut output = Output::new(use_color);
    let mut values = Binds::new();
    for (i, bind) in pattern.binds().iter().enumerate() {
        let value = output
            .prompt(i + 1, &bind.name)
            .context("input interrupted")?;
        values.push(Bind::new(bind.name.clone(), value));
    }

    let filled = pattern.apply(&values).context("filling template")?;
    println!("{filled}");
    Ok(())
}

fn rewrite(
    lhs: &str,
    rhs: &str,
    binds: &[Bind],
    check: bool,
    reverse: bool,
    input: Option<&Path>,
) -> anyhow::Result<()> {
    let text = read_input(input)?;

    let rewritten = if check {
        let mut t = Reversible::new(lhs, rhs, binds)?;
        if reverse {
            t = t.reverse();
        }
        t.replace(&text)?
    } else {
        let mut t = Transform::new(lhs, rhs, binds)?;
        if reverse {
            t = t.reverse();
        }
        t.replace(&text)?
    };

    print!("{rewritten}");
    std::io::stdout().flush()?;
    Ok(())
}

fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading input '{}'", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}
