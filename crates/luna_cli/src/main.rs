mod config;
mod error;
mod poller;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use luna_core::{Body, Oracle};
use luna_search::{CancellationToken, SearchOutcome, lunation_at, next_full_moon, next_new_moon};
use luna_time::{JulianDay, TimeConverter, format_iso, parse_iso};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::CliError;
use crate::poller::Poller;

#[derive(Parser)]
#[command(name = "newmoon", about = "New moon search over a JPL DE ephemeris", version)]
struct Cli {
    /// Config file (default: ./newmoon.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Ephemeris file; repeat for a fallback list
    #[arg(long, global = true)]
    ephem: Vec<PathBuf>,
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print each upcoming new moon, polling at a fixed interval
    Watch {
        /// UTC start (YYYY-MM-DDThh:mm:ssZ); follows the clock when omitted
        #[arg(long, value_parser = parse_iso)]
        start: Option<DateTime<Utc>>,
        /// Stop after this many new moons
        #[arg(long)]
        count: Option<usize>,
        /// Seconds between searches (default from config)
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// Find the next new or full moon
    Next {
        /// UTC start (YYYY-MM-DDThh:mm:ssZ, default now)
        #[arg(long, value_parser = parse_iso)]
        start: Option<DateTime<Utc>>,
        #[arg(long, value_enum, default_value_t = Phase::New)]
        phase: Phase,
    },
    /// New moons before and after an instant, with moon age
    Lunation {
        /// UTC instant (YYYY-MM-DDThh:mm:ssZ, default now)
        #[arg(long, value_parser = parse_iso)]
        at: Option<DateTime<Utc>>,
    },
    /// Raw state vector of a body relative to a center
    State {
        /// Body name or DE code
        #[arg(long, default_value = "moon")]
        target: Body,
        /// Body name or DE code
        #[arg(long, default_value = "earth")]
        center: Body,
        /// UTC instant (YYYY-MM-DDThh:mm:ssZ, default now)
        #[arg(long, value_parser = parse_iso)]
        at: Option<DateTime<Utc>>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum Phase {
    New,
    Full,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn jd_or_now(time: &TimeConverter, at: Option<DateTime<Utc>>) -> JulianDay {
    at.map_or_else(|| time.now(), |t| time.to_julian(t))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "newmoon failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if !cli.ephem.is_empty() {
        config.ephemeris.sources = cli.ephem;
    }
    let oracle = Oracle::open(&config.ephemeris.sources)?;

    match cli.command {
        Commands::Watch {
            start,
            count,
            interval_secs,
        } => watch(&oracle, &config, start, count, interval_secs),
        Commands::Next { start, phase } => next(&oracle, &config, start, phase),
        Commands::Lunation { at } => lunation(&oracle, &config, at),
        Commands::State { target, center, at } => {
            let time = config.time_converter();
            let jd = jd_or_now(&time, at);
            let state = oracle.query_state(jd.days(), center, target)?;
            let [x, y, z] = state.position_km;
            let [vx, vy, vz] = state.velocity_km_s;
            println!("{target} relative to {center} at {jd}");
            println!("Position: [{x:.3}, {y:.3}, {z:.3}] km");
            println!("Velocity: [{vx:.6}, {vy:.6}, {vz:.6}] km/s");
            println!("Distance: {:.3} km", (x * x + y * y + z * z).sqrt());
            Ok(())
        }
    }
}

fn watch(
    oracle: &Oracle,
    config: &Config,
    start: Option<DateTime<Utc>>,
    count: Option<usize>,
    interval_secs: Option<u64>,
) -> Result<(), CliError> {
    let token = CancellationToken::new();
    let search = config.search_config().with_cancellation(token.clone());
    let time = &search.time;
    let interval = interval_secs.map_or_else(|| config.poll_interval(), Duration::from_secs);
    let resume = config.resume_offset_days().max(search.step_days);
    let follow_clock = start.is_none();
    let mut cursor = jd_or_now(time, start);

    let poller = Poller::new(interval, count).with_token(token);
    let cycles = poller.run(|cycle| -> Result<(), CliError> {
        if follow_clock {
            let now = time.now();
            if now > cursor {
                cursor = now;
            }
        }
        match next_new_moon(oracle, cursor, &search)? {
            SearchOutcome::Found(event) => {
                println!("{}  {}", format_iso(event.utc), event.jd);
                tracing::info!(cycle, jd = event.jd.days(), "new moon");
                cursor = event.jd.add_days(resume);
            }
            SearchOutcome::NotFound { steps } => {
                tracing::warn!(cycle, steps, from = %cursor, "no new moon in search window");
                let advance = (search.window_days() - search.step_days).max(search.step_days);
                cursor = cursor.add_days(advance);
            }
        }
        Ok(())
    })?;
    tracing::debug!(cycles, "watch finished");
    Ok(())
}

fn next(
    oracle: &Oracle,
    config: &Config,
    start: Option<DateTime<Utc>>,
    phase: Phase,
) -> Result<(), CliError> {
    let (search, label) = match phase {
        Phase::New => (config.search_config(), "new moon"),
        Phase::Full => (config.full_moon_config(), "full moon"),
    };
    let from = jd_or_now(&search.time, start);
    let outcome = match phase {
        Phase::New => next_new_moon(oracle, from, &search)?,
        Phase::Full => next_full_moon(oracle, from, &search)?,
    };
    let event = outcome.into_event().ok_or(CliError::NotFound(label))?;
    println!("Next {label}: {}", format_iso(event.utc));
    println!("  {}", event.jd);
    println!("  Sun-Moon angle: {:.6} rad", event.value);
    Ok(())
}

fn lunation(oracle: &Oracle, config: &Config, at: Option<DateTime<Utc>>) -> Result<(), CliError> {
    let search = config.search_config();
    let at = jd_or_now(&search.time, at);
    let l = lunation_at(oracle, at, &search)?.ok_or(CliError::NotFound("lunation"))?;
    println!("Lunation {}", l.number);
    println!("  Previous new moon: {}", format_iso(l.previous.utc));
    println!("  Next new moon:     {}", format_iso(l.next.utc));
    println!(
        "  Age: {:.2} days of {:.2} ({:.1}%)",
        l.age_days,
        l.length_days(),
        l.phase_fraction * 100.0
    );
    println!("  Illuminated: {:.1}%", l.illuminated * 100.0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_watch_with_globals() {
        let cli = Cli::try_parse_from([
            "newmoon",
            "watch",
            "--start",
            "2024-01-01T00:00:00Z",
            "--count",
            "2",
            "--ephem",
            "a.431",
            "--ephem",
            "b.430",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.ephem, vec![PathBuf::from("a.431"), PathBuf::from("b.430")]);
        assert_eq!(cli.verbose, 2);
        let Commands::Watch { start, count, interval_secs } = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(start.map(format_iso).as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(count, Some(2));
        assert_eq!(interval_secs, None);
    }

    #[test]
    fn next_defaults_to_new_moon() {
        let cli = Cli::try_parse_from(["newmoon", "next", "--start", "2024-01-01"]).unwrap();
        let Commands::Next { phase, start } = cli.command else {
            panic!("expected next");
        };
        assert_eq!(phase, Phase::New);
        assert!(start.is_some());

        let cli = Cli::try_parse_from(["newmoon", "next", "--phase", "full"]).unwrap();
        assert!(matches!(cli.command, Commands::Next { phase: Phase::Full, start: None }));
    }

    #[test]
    fn state_parses_bodies() {
        let cli = Cli::try_parse_from(["newmoon", "state", "--target", "sun", "--center", "3"])
            .unwrap();
        let Commands::State { target, center, .. } = cli.command else {
            panic!("expected state");
        };
        assert_eq!(target, Body::Sun);
        assert_eq!(center, Body::Earth);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Cli::try_parse_from(["newmoon", "state", "--target", "vulcan"]).is_err());
        assert!(Cli::try_parse_from(["newmoon", "next", "--start", "yesterday"]).is_err());
        assert!(Cli::try_parse_from(["newmoon", "next", "--phase", "half"]).is_err());
    }
}
