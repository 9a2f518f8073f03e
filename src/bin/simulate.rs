//! Run all-bot Ludo matches on a virtual clock and print the standings.
//!
//! Usage: cargo run --bin simulate -- [--games 100] [--seed 42] [--exact-finish] [--json]
//!
//! Set `RUST_LOG=ludo_engine=debug` to trace every transition.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use ludo_engine::{
    BaseFirst, ConfigError, EngineError, FinishRule, FirstLegal, MatchConfig, MovePolicy, PlayerId, RulesConfig,
    SeatConfig, Table, TimingConfig, UniformRandom, SEAT_COUNT,
};

/// Simulate all-bot Ludo matches
#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Play bot-only Ludo matches and report standings", long_about = None)]
struct Args {
    /// Number of matches to play
    #[arg(long, default_value_t = 1)]
    games: u64,

    /// Seed of the first match; match `i` uses `seed + i`
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Require an exact roll to reach home
    #[arg(long)]
    exact_finish: bool,

    /// Bot move policy
    #[arg(long, value_enum, default_value_t = Policy::BaseFirst)]
    policy: Policy,

    /// Use the product's animation timings instead of zero delays
    #[arg(long)]
    real_timing: bool,

    /// Print one JSON object per match instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    BaseFirst,
    FirstLegal,
    Random,
}

impl Policy {
    fn build(self) -> Box<dyn MovePolicy> {
        match self {
            Policy::BaseFirst => Box::new(BaseFirst),
            Policy::FirstLegal => Box::new(FirstLegal),
            Policy::Random => Box::new(UniformRandom),
        }
    }
}

#[derive(Debug, Error)]
enum SimulateError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("match stalled: {0}")]
    Engine(#[from] EngineError),
}

#[derive(Serialize)]
struct MatchSummary {
    seed: u64,
    standings: Vec<PlayerId>,
    turns: u32,
    captures: usize,
    virtual_ms: u64,
}

fn play(args: &Args, seed: u64) -> Result<MatchSummary, SimulateError> {
    let finish_rule = if args.exact_finish {
        FinishRule::Exact
    } else {
        FinishRule::OvershootToHome
    };
    let timing = if args.real_timing {
        TimingConfig::default()
    } else {
        TimingConfig::instant()
    };
    let config = MatchConfig::default()
        .with_seed(seed)
        .with_rules(RulesConfig::default().with_finish_rule(finish_rule))
        .with_timing(timing);

    let seats: [SeatConfig; SEAT_COUNT] =
        std::array::from_fn(|i| SeatConfig::bot(format!("bot-{i}"), format!("Bot {}", PlayerId(i as u8).color())));
    let mut table = Table::new(seats, &config, 0)?.with_policy(args.policy.build());

    let mut captures = 0;
    let virtual_ms = table.run_until(u64::MAX, |events| {
        captures += events.iter().filter(|e| e.is_capture()).count();
    })?;

    let standings = table
        .state()
        .standings()
        .into_iter()
        .map(|(seat, _)| seat)
        .collect();
    Ok(MatchSummary {
        seed,
        standings,
        turns: table.state().turn_number(),
        captures,
        virtual_ms,
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(?args, "starting simulation");

    let mut wins = [0u64; SEAT_COUNT];
    for i in 0..args.games {
        let seed = args.seed.wrapping_add(i);
        let summary = match play(&args, seed) {
            Ok(summary) => summary,
            Err(err) => {
                error!(%err, seed, "simulation failed");
                return ExitCode::FAILURE;
            }
        };

        if let Some(winner) = summary.standings.first() {
            wins[winner.index()] += 1;
        }
        if args.json {
            match serde_json::to_string(&summary) {
                Ok(line) => println!("{line}"),
                Err(err) => error!(%err, "failed to encode summary"),
            }
        } else {
            let order: Vec<String> = summary.standings.iter().map(|p| p.color().to_string()).collect();
            println!(
                "seed {:>6}  turns {:>4}  captures {:>3}  standings {}",
                summary.seed,
                summary.turns,
                summary.captures,
                order.join(" > ")
            );
        }
    }

    if !args.json && args.games > 1 {
        println!();
        for seat in PlayerId::all() {
            println!("{:<7} won {:>5} of {}", seat.color().to_string(), wins[seat.index()], args.games);
        }
    }
    ExitCode::SUCCESS
}
