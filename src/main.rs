use clap::Parser;
use natural_tuple::{driver, NaturalTuple};
use tracing_subscriber::EnvFilter;

/// Interactive shell over a tuple of natural numbers
#[derive(Parser, Debug)]
#[command(name = "natural-tuple")]
#[command(version)]
struct Cli {
    /// Initial numbers; values <= 0 are ignored
    #[arg(allow_negative_numbers = true)]
    values: Vec<i32>,

    /// Tracing filter directives (e.g. `natural_tuple=debug`)
    #[arg(long, env = "NATURAL_TUPLE_LOG", default_value = "natural_tuple=warn")]
    log_filter: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_filter)?)
        .with_writer(std::io::stderr)
        .init();

    let mut tuple = NaturalTuple::new(cli.values);
    tracing::info!(len = tuple.len(), "starting command loop");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    driver::run(&mut tuple, stdin.lock(), stdout.lock())?;
    Ok(())
}
