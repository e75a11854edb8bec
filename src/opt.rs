use anyhow::bail;
use anyhow::Result;
use pico_args::Arguments;
use srs_engine::schedule::DEFAULT_DIFFICULTY;
use srs_engine::schedule::DEFAULT_STABILITY;
use srs_engine::schedule::MAX_DIFFICULTY;
use srs_engine::schedule::MIN_DIFFICULTY;
use srs_engine::Grade;
use std::ffi::OsString;

pub const HELP: &str = "\
srs-engine - exercise the spaced repetition scheduler

USAGE:
  srs-engine [-v] <COMMAND> [OPTIONS]

COMMANDS:
  sample    --weights W,W,.. [--draws N] [--seed S]
  review    --grade G [--weight W] [--stability H] [--difficulty D]
  simulate  --grades G,G,.. [--weight W] [--stability H] [--difficulty D]
  drill     --weights W,W,.. [--rounds N] [--seed S]

FLAGS:
  -h, --help     Print help
  -v, --verbose  Log every sample and review

Grades are again, hard, good, easy or 0-3. Set SRS_ENGINE_LOG to override
the log filter.
";

const DEFAULT_DRAWS: u32 = 10_000;
const DEFAULT_ROUNDS: u32 = 20;

#[derive(Debug, PartialEq)]
pub struct Args {
    pub command: Command,
    pub verbose: bool,
}

/// Where a topic starts before the first simulated review.
#[derive(Debug, PartialEq)]
pub struct TopicArgs {
    pub stability: f64,
    pub difficulty: f64,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Help,
    Sample {
        weights: Vec<f64>,
        draws: u32,
        seed: Option<u64>,
    },
    Review {
        grade: Grade,
        weight: f64,
        topic: TopicArgs,
    },
    Simulate {
        grades: Vec<Grade>,
        weight: f64,
        topic: TopicArgs,
    },
    Drill {
        weights: Vec<f64>,
        rounds: u32,
        seed: Option<u64>,
    },
}

pub fn parse() -> Result<Args> {
    parse_from(std::env::args_os().skip(1).collect())
}

pub fn parse_from(args: Vec<OsString>) -> Result<Args> {
    let mut pargs = Arguments::from_vec(args);

    let verbose = pargs.contains(["-v", "--verbose"]);

    if pargs.contains(["-h", "--help"]) {
        return Ok(Args {
            command: Command::Help,
            verbose,
        });
    }

    let command = match pargs.subcommand()?.as_deref() {
        Some("sample") => Command::Sample {
            weights: pargs.value_from_fn("--weights", parse_weights)?,
            draws: pargs.opt_value_from_str("--draws")?.unwrap_or(DEFAULT_DRAWS),
            seed: pargs.opt_value_from_str("--seed")?,
        },
        Some("review") => Command::Review {
            grade: pargs.value_from_str("--grade")?,
            weight: weight(&mut pargs)?,
            topic: topic(&mut pargs)?,
        },
        Some("simulate") => Command::Simulate {
            grades: pargs.value_from_fn("--grades", parse_grades)?,
            weight: weight(&mut pargs)?,
            topic: topic(&mut pargs)?,
        },
        Some("drill") => Command::Drill {
            weights: pargs.value_from_fn("--weights", parse_weights)?,
            rounds: pargs.opt_value_from_str("--rounds")?.unwrap_or(DEFAULT_ROUNDS),
            seed: pargs.opt_value_from_str("--seed")?,
        },
        Some(other) => bail!("unknown command '{other}'"),
        None => Command::Help,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        bail!("unexpected arguments: {remaining:?}");
    }

    Ok(Args { command, verbose })
}

fn weight(pargs: &mut Arguments) -> Result<f64> {
    Ok(pargs.opt_value_from_str("--weight")?.unwrap_or(1.0))
}

fn topic(pargs: &mut Arguments) -> Result<TopicArgs> {
    let stability = pargs
        .opt_value_from_str("--stability")?
        .unwrap_or(DEFAULT_STABILITY);
    let difficulty = pargs
        .opt_value_from_str("--difficulty")?
        .unwrap_or(DEFAULT_DIFFICULTY);

    if stability <= 0.0 {
        bail!("stability must be > 0, given {stability}");
    }

    if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
        bail!("difficulty must be between {MIN_DIFFICULTY} and {MAX_DIFFICULTY}, given {difficulty}");
    }

    Ok(TopicArgs {
        stability,
        difficulty,
    })
}

fn parse_weights(s: &str) -> Result<Vec<f64>> {
    let weights = s
        .split(',')
        .map(|w| w.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()?;

    if weights.is_empty() {
        bail!("at least one weight is required");
    }

    Ok(weights)
}

fn parse_grades(s: &str) -> Result<Vec<Grade>> {
    Ok(s.split(',')
        .map(|g| g.trim().parse::<Grade>())
        .collect::<Result<Vec<_>, _>>()?)
}
