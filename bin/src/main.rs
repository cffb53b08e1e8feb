use std::{
    io::{stderr, stdin, stdout, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;

#[derive(clap::Parser)]
#[command(about = "Tokenize, parse or evaluate a Lox expression")]
struct Args {
    /// Starts an interactive prompt when no command is given
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Print every token of the file
    Tokenize { file: PathBuf },
    /// Print the syntax tree of the expression in the file
    Parse { file: PathBuf },
    /// Print the value of the expression in the file
    Evaluate { file: PathBuf },
}

fn read(path: &Path) -> anyhow::Result<String> {
    lox::read_source(path).with_context(|| format!("Could not read {}", path.display()))
}

fn run_file(command: Command) -> anyhow::Result<()> {
    log::debug!("Running {command:?}");
    let mut out = stdout().lock();
    let result = match command {
        Command::Tokenize { file } => lox::tokenize(&read(&file)?, &mut out),
        Command::Parse { file } => lox::parse(&read(&file)?, &mut out),
        Command::Evaluate { file } => lox::evaluate(&read(&file)?, &mut out),
    };
    out.flush()?;

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(e.exit_code());
    }
    Ok(())
}

fn run_prompt() -> anyhow::Result<()> {
    lox::run_prompt(stdin().lock(), &mut stdout(), &mut stderr())?;
    println!();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Some(command) => run_file(command),
        None => run_prompt(),
    }
}
