use clap::Parser;
use dsbgraph::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{graph, process},
    utils::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Process(_) => "process",
        Command::Graph(_) => "graph",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        *FULL_VERSION,
        subcommand_name
    );
    match cli.command {
        Command::Process(args) => process::process(args)?,
        Command::Graph(args) => graph::graph(args)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
