use std::time::Duration;

use clap::{Parser, ValueEnum};
use reversi_engine::agent::ai::InterruptPolicy;
use reversi_engine::{
    BoardState, Decider, Difficulty, Game, GameError, MinimaxDecider, MtdDecider, Player,
    RandomDecider, SearchConfig, Status,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Random,
    Minimax,
    Mtd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Level {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
            Level::Expert => Difficulty::Expert,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    DiscardAll,
    KeepForcedOutcomes,
    DemoteFallenBest,
}

impl From<Policy> for InterruptPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::DiscardAll => InterruptPolicy::DiscardAll,
            Policy::KeepForcedOutcomes => InterruptPolicy::KeepForcedOutcomes,
            Policy::DemoteFallenBest => InterruptPolicy::DemoteFallenBest,
        }
    }
}

/// Play one game of flip-capture between two deciders.
#[derive(Parser)]
#[command(name = "reversi_engine", about = "Play a game between two deciders")]
struct Cli {
    /// Board width (even, 2 to 8)
    #[arg(long, default_value_t = 8)]
    size: usize,

    /// Decider for the side that moves first
    #[arg(long, value_enum, default_value = "mtd")]
    one: Kind,

    /// Decider for the side that moves second
    #[arg(long, value_enum, default_value = "random")]
    two: Kind,

    /// Difficulty preset for search deciders
    #[arg(long, value_enum, default_value = "medium")]
    difficulty: Level,

    /// Override the maximum search depth in plies
    #[arg(long)]
    depth: Option<u32>,

    /// Override the per-decision time budget in milliseconds (0 disables it)
    #[arg(long)]
    time_ms: Option<u64>,

    /// Root ranking kept when a depth is cut short
    #[arg(long, value_enum)]
    policy: Option<Policy>,

    /// Search MTD root actions with a full window instead of MTD(f)
    #[arg(long)]
    full_window: bool,

    /// Score minimax root actions on the rayon pool
    #[arg(long)]
    parallel: bool,

    /// Let the second decider move first
    #[arg(long)]
    swap: bool,

    /// Seed for random and tie-breaking deciders
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl Cli {
    fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::from_difficulty(self.difficulty.into());
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(ms) = self.time_ms {
            let budget = (ms > 0).then(|| Duration::from_millis(ms));
            config = config.with_time_budget(budget);
        }
        if let Some(policy) = self.policy {
            config = config.with_interrupt_policy(policy.into());
        }
        config.with_mtdf(!self.full_window).with_parallel(self.parallel)
    }

    fn decider(&self, kind: Kind, seed: u64) -> Box<dyn Decider<BoardState>> {
        match kind {
            Kind::Random => Box::new(RandomDecider::new(seed)),
            Kind::Minimax => Box::new(MinimaxDecider::new(self.search_config(), seed)),
            Kind::Mtd => Box::new(MtdDecider::new(self.search_config())),
        }
    }
}

fn main() -> Result<(), GameError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let state = BoardState::new(cli.size)?;
    let mut game = Game::new(
        state,
        cli.decider(cli.one, cli.seed),
        cli.decider(cli.two, cli.seed.wrapping_add(1)),
    );
    if cli.swap {
        game.set_starting_player(Player::Two);
    }

    log::info!(
        "{} vs {} on {}x{}",
        game.decider(Player::One).name(),
        game.decider(Player::Two).name(),
        cli.size,
        cli.size
    );
    let status = game.run()?;

    let (one, two) = game.state().scores();
    println!("{}", game.state());
    let passes = game.history().iter().filter(|action| action.is_pass()).count();
    println!("O {one} - X {two} after {} plies ({passes} passes)", game.ply());
    match status {
        Status::PlayerOneWon => println!("player one (O) wins"),
        Status::PlayerTwoWon => println!("player two (X) wins"),
        Status::Draw => println!("draw"),
        Status::Ongoing => println!("unfinished"),
    }
    Ok(())
}
