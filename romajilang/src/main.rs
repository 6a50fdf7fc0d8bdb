use clap::Parser;

/// Runs a RomajiLang script and prints whatever it printed, faults included.
#[derive(Debug, Parser)]
struct Cli {
    /// A script to run.
    #[arg(short, long)]
    script: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let code = std::fs::read_to_string(&cli.script)?;
    print!("{}", romajilang::run(&code));

    Ok(())
}
