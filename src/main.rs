//! gamesearch: run the search strategies on an explicit game tree.
//!
//! ## Usage
//!
//! - `gamesearch` - Show a demo on the built-in tree
//! - `gamesearch search -s negascout -d 3` - Run one strategy
//! - `gamesearch compare --tree my.tree` - Run every fixed-depth strategy side by side
//!
//! Set `RUST_LOG=gamesearch=debug` to see per-search summaries.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gamesearch::constants::{
    DEFAULT_EXPLORE_EXPLOIT_RATIO, DEFAULT_JEOPARDY_WEIGHT, DEFAULT_MAX_QUIESCENT_DEPTH,
    DEFAULT_MIN_BEST_MOVES, DEFAULT_PERCENTAGE_BEST_MOVES, DEFAULT_PERCENT_LESS_THAN_BEST_THRESH,
    DEFAULT_RANDOM_LOOK_AHEAD,
};
use gamesearch::game_tree::{EXAMPLE_TREE, GameTree, TreePosition};
use gamesearch::options::SearchOptions;
use gamesearch::strategy::{SearchStrategyType, create_strategy};
use gamesearch::weights::Weights;

/// Adversarial game-tree search over explicit trees
#[derive(Parser)]
#[command(name = "gamesearch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a tree with one strategy
    Search {
        /// minimax, negamax, negascout, mtd or uct. Negamax, negascout and mtd
        /// take a -memory suffix to keep a transposition table
        #[arg(short, long, default_value = "minimax")]
        strategy: SearchStrategyType,
        #[command(flatten)]
        args: SearchArgs,
    },
    /// Search a tree with every fixed-depth strategy
    Compare {
        #[command(flatten)]
        args: SearchArgs,
    },
    /// Run the strategies on the built-in example tree
    Demo,
}

/// Options shared by every subcommand. Also parsed standalone for the demo.
#[derive(Parser, Debug, Clone)]
struct SearchArgs {
    /// Tree file with one `<id> <value> [urgent]` line per node
    #[arg(long)]
    tree: Option<PathBuf>,
    /// Plies searched by the fixed-depth strategies
    #[arg(short = 'd', long, default_value_t = 3)]
    look_ahead: u32,
    /// Disable alpha-beta pruning (MiniMax and NegaMax only)
    #[arg(long)]
    no_alpha_beta: bool,
    /// Extend the search along urgent moves in unstable positions
    #[arg(short, long)]
    quiescence: bool,
    #[arg(long, default_value_t = DEFAULT_MAX_QUIESCENT_DEPTH)]
    max_quiescent_depth: u32,
    #[arg(long, default_value_t = DEFAULT_JEOPARDY_WEIGHT)]
    jeopardy_weight: i32,
    /// Percentage of moves kept at each ply
    #[arg(long, default_value_t = DEFAULT_PERCENTAGE_BEST_MOVES)]
    best_percent: u32,
    #[arg(long, default_value_t = DEFAULT_MIN_BEST_MOVES)]
    min_best_moves: usize,
    /// Monte-Carlo simulations per search
    #[arg(long, default_value_t = 1000)]
    simulations: u32,
    #[arg(long, default_value_t = DEFAULT_EXPLORE_EXPLOIT_RATIO)]
    explore_exploit: f64,
    #[arg(long, default_value_t = DEFAULT_RANDOM_LOOK_AHEAD)]
    random_look_ahead: u32,
    /// Playouts pick among moves within this percentage of the best
    #[arg(long, default_value_t = DEFAULT_PERCENT_LESS_THAN_BEST_THRESH)]
    playout_thresh: u32,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 1)]
    workers: usize,
}

impl SearchArgs {
    fn options(&self) -> SearchOptions {
        SearchOptions::default()
            .with_look_ahead(self.look_ahead)
            .with_alpha_beta(!self.no_alpha_beta)
            .with_quiescence(self.quiescence)
            .with_max_quiescent_depth(self.max_quiescent_depth)
            .with_best_moves(self.best_percent, self.min_best_moves)
            .with_percent_less_than_best_thresh(self.playout_thresh)
            .with_max_simulations(self.simulations)
            .with_explore_exploit_ratio(self.explore_exploit)
            .with_random_look_ahead(self.random_look_ahead)
            .with_seed(self.seed)
            .with_workers(self.workers)
    }

    fn weights(&self) -> Weights {
        Weights::default().with_jeopardy_weight(self.jeopardy_weight)
    }

    fn load_tree(&self) -> Result<GameTree> {
        match &self.tree {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading tree file {}", path.display()))?;
                GameTree::parse(&text).with_context(|| format!("parsing {}", path.display()))
            }
            None => GameTree::parse(EXAMPLE_TREE).context("parsing built-in example tree"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search { strategy, args }) => {
            let tree = Arc::new(args.load_tree()?);
            run(strategy, &args, &tree)
        }
        Some(Commands::Compare { args }) => {
            let tree = Arc::new(args.load_tree()?);
            for kind in SearchStrategyType::ALL.into_iter().filter(|k| k.is_brute_force()) {
                run(kind, &args, &tree)?;
            }
            Ok(())
        }
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run(kind: SearchStrategyType, args: &SearchArgs, tree: &Arc<GameTree>) -> Result<()> {
    let weights = args.weights();
    let mut strategy = create_strategy::<TreePosition>(kind, args.options(), &weights)
        .with_context(|| format!("configuring {kind}"))?;
    let mut position = TreePosition::new(Arc::clone(tree));

    let best = strategy.search(&mut position, &tree.root_move());
    let stats = strategy.stats();
    match best {
        Some(mv) => println!(
            "{:<16} move {:<6} inherited {:>6}  moves considered {}",
            kind.name(),
            format!("\"{}\"", mv.action),
            mv.inherited_value,
            stats.moves_considered
        ),
        None => println!("{:<16} no move found", kind.name()),
    }
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("gamesearch: adversarial search on the built-in four ply tree\n");
    let tree = Arc::new(GameTree::parse(EXAMPLE_TREE).context("parsing built-in example tree")?);
    let args = SearchArgs::parse_from(["demo"]);

    for look_ahead in 1..=3 {
        println!("=== look ahead {look_ahead} ===");
        let args = SearchArgs {
            look_ahead,
            ..args.clone()
        };
        for kind in SearchStrategyType::ALL.into_iter().filter(|k| k.is_brute_force()) {
            run(kind, &args, &tree)?;
        }
        println!();
    }

    println!("=== Monte-Carlo, 10 simulations ===");
    let args = SearchArgs {
        simulations: 10,
        random_look_ahead: 10,
        ..args
    };
    run(SearchStrategyType::Uct, &args, &tree)
}
