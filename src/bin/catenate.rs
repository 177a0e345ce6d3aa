use std::io::Read;

use anyhow::Context;
use catenate::{normalize, parse};
use clap::Parser as ClapParser;

/// Parse, normalize and print a concatenative-calculus program.
#[derive(ClapParser)]
struct Cli {
    /// Program source; reads stdin if omitted.
    program: Option<String>,

    /// Print the normal form as an indented tree instead of canonical
    /// surface syntax.
    #[arg(long)]
    tree: bool,

    /// Print the machine's step-by-step rewrite trace to stdout (debug
    /// builds only).
    #[arg(long)]
    trace: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let source = match cli.program {
        Some(program) => program,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading program from stdin")?;
            buf
        }
    };

    let term = parse(&source).with_context(|| format!("parsing `{source}`"))?;

    if cli.trace {
        let mut machine = catenate::Machine::new(term);
        machine.set_log(catenate::Log::Verbose("catenate"));
        while machine.has_next() {
            machine.step();
        }
        let result = machine.value();
        print_result(&result, cli.tree)?;
    } else {
        let result = normalize(term);
        print_result(&result, cli.tree)?;
    }

    Ok(())
}

fn print_result(term: &catenate::Term, as_tree: bool) -> anyhow::Result<()> {
    if as_tree {
        term.print_tree().context("printing term tree")?;
    } else {
        println!("{term}");
    }
    Ok(())
}
