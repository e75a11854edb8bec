mod app;
mod opt;
mod prompt;

use anyhow::Result;
use app::App;
use opt::Command;
use srs_engine::UtcClock;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SRS_ENGINE_LOG";

fn main() -> Result<()> {
    let args = opt::parse()?;

    init_tracing(args.verbose);

    let app = App::new(UtcClock);

    match args.command {
        Command::Help => print!("{}", opt::HELP),
        Command::Sample {
            weights,
            draws,
            seed,
        } => app.sample(&weights, draws, seed)?,
        Command::Review {
            grade,
            weight,
            topic,
        } => app.review(grade, weight, topic)?,
        Command::Simulate {
            grades,
            weight,
            topic,
        } => app.simulate(&grades, weight, topic)?,
        Command::Drill {
            weights,
            rounds,
            seed,
        } => app.drill(&weights, rounds, seed)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
