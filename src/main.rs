//! connectn: play Connect-N between engine strategies.
//!
//! ## Usage
//!
//! - `connectn` - Show a demo
//! - `connectn play --one minimax --two mcts` - Run one match
//! - `connectn demo` - Show every strategy on a few fixed positions

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use connectn::agent::{Agent, RandomAgent};
use connectn::board::{Board, Player};
use connectn::constants::{DEFAULT_COLS, DEFAULT_CONNECT, DEFAULT_ROWS, MINIMAX_DEPTH, N_SIMS};
use connectn::game::{Game, play_match};
use connectn::heuristic::HeuristicAgent;
use connectn::mcts::{MctsAgent, MctsConfig};
use connectn::minimax::MinimaxAgent;

/// connectn: Connect-N engine with heuristic, minimax and MCTS players
#[derive(Parser)]
#[command(name = "connectn")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match between two agents
    Play(PlayArgs),
    /// Show each strategy on a few fixed positions
    Demo,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AgentKind {
    Random,
    Offensive,
    Defensive,
    Minimax,
    Mcts,
}

#[derive(Args)]
struct PlayArgs {
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,

    /// Tokens in a row needed to win
    #[arg(long, default_value_t = DEFAULT_CONNECT)]
    connect: usize,

    /// Agent for player one
    #[arg(long, value_enum, default_value_t = AgentKind::Minimax)]
    one: AgentKind,

    /// Agent for player two
    #[arg(long, value_enum, default_value_t = AgentKind::Mcts)]
    two: AgentKind,

    /// Minimax search depth in plies
    #[arg(long, default_value_t = MINIMAX_DEPTH)]
    depth: usize,

    /// MCTS simulations per move
    #[arg(long, default_value_t = N_SIMS, conflicts_with = "time_limit_ms")]
    simulations: u32,

    /// MCTS wall-clock limit per move, in milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Seed for the random generators (player two uses seed + 1)
    #[arg(long)]
    seed: Option<u64>,

    /// Only print the result
    #[arg(long)]
    quiet: bool,
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level {level:?}"))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Play(args)) => {
            let level = if args.quiet { "warn" } else { cli.log_level.as_str() };
            init_tracing(level)?;
            run_match(&args)
        }
        Some(Commands::Demo) | None => {
            init_tracing(&cli.log_level)?;
            run_demo()
        }
    }
}

fn build_agent(kind: AgentKind, args: &PlayArgs, seed: Option<u64>) -> Box<dyn Agent> {
    match kind {
        AgentKind::Random => Box::new(match seed {
            Some(s) => RandomAgent::with_seed(s),
            None => RandomAgent::new(),
        }),
        AgentKind::Offensive => Box::new(HeuristicAgent::offensive()),
        AgentKind::Defensive => Box::new(HeuristicAgent::defensive()),
        AgentKind::Minimax => Box::new(MinimaxAgent::new(args.depth)),
        AgentKind::Mcts => {
            let config = match args.time_limit_ms {
                Some(ms) => MctsConfig::default().with_time_limit(Duration::from_millis(ms)),
                None => MctsConfig::default().with_simulations(args.simulations),
            };
            Box::new(match seed {
                Some(s) => MctsAgent::with_seed(config, s),
                None => MctsAgent::new(config),
            })
        }
    }
}

fn run_match(args: &PlayArgs) -> Result<()> {
    let board = Board::new(args.rows, args.cols, args.connect).context("cannot set up the board")?;
    let mut game = Game::new(board);

    let mut one = build_agent(args.one, args, args.seed);
    let mut two = build_agent(args.two, args, args.seed.map(|s| s.wrapping_add(1)));

    let result = play_match(&mut game, &mut one, &mut two).context("match aborted")?;

    if !args.quiet {
        println!("{}", game.board());
    }
    match result {
        Some(Player::One) => println!("Winner: {} (P1)", one.name()),
        Some(Player::Two) => println!("Winner: {} (P2)", two.name()),
        None => println!("Draw!"),
    }
    Ok(())
}

fn demo_agents() -> Vec<Box<dyn Agent>> {
    vec![
        Box::new(RandomAgent::with_seed(1)),
        Box::new(HeuristicAgent::offensive()),
        Box::new(HeuristicAgent::defensive()),
        Box::new(MinimaxAgent::new(4)),
        Box::new(MctsAgent::with_seed(MctsConfig::default().with_simulations(1000), 1)),
    ]
}

fn show_position(title: &str, moves: &[(usize, Player)], to_move: Player) -> Result<()> {
    let mut board = Board::default();
    for &(col, p) in moves {
        board.play(col, p)?;
    }
    println!("=== {title} ===");
    println!("{board}");
    for mut agent in demo_agents() {
        let col = agent
            .select_move(&board, to_move)
            .with_context(|| format!("{} failed to move", agent.name()))?;
        println!("{:>20} ({to_move}) -> col {col}", agent.name());
    }
    println!();
    Ok(())
}

fn run_demo() -> Result<()> {
    use Player::{One, Two};

    println!("connectn: Connect-N engine\n");

    show_position(
        "Win in one",
        &[(3, One), (0, Two), (3, One), (6, Two), (3, One)],
        One,
    )?;
    show_position(
        "Block the open row",
        &[(0, Two), (1, Two), (2, Two), (6, One), (6, One)],
        One,
    )?;
    show_position(
        "Make a double threat",
        &[(2, One), (3, One), (2, Two), (3, Two)],
        One,
    )?;

    println!("=== Minimax vs MCTS ===");
    let mut game = Game::default();
    let mut one = MinimaxAgent::new(4);
    let mut two = MctsAgent::with_seed(MctsConfig::default().with_simulations(1000), 2);
    let result = play_match(&mut game, &mut one, &mut two).context("demo match aborted")?;
    println!("{}", game.board());
    match result {
        Some(p) => info!(winner = %p, moves = game.history().len(), "demo match finished"),
        None => info!(moves = game.history().len(), "demo match drawn"),
    }
    Ok(())
}
