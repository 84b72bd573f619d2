use anyhow::{Result, ensure};
use clap::Parser;

use gridsnake::app::{App, Speed};
use gridsnake::game::{GameConfig, WallPolicy};

#[derive(Parser)]
#[command(name = "gridsnake")]
#[command(version, about = "Tick-driven terminal snake game")]
struct Cli {
    /// Grid width
    #[arg(long, default_value = "20")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "20")]
    height: usize,

    /// Tick speed
    #[arg(long, value_enum, default_value = "normal")]
    speed: Speed,

    /// Ignore out-of-bounds moves instead of ending the round
    #[arg(long)]
    lenient_walls: bool,

    /// Do not end the round when the snake runs into itself
    #[arg(long)]
    no_self_collision: bool,

    /// Allow direction inputs that reverse the snake onto itself
    #[arg(long)]
    allow_reversal: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    ensure!(
        cli.width >= 5 && cli.height >= 1,
        "grid must be at least 5x1 to fit the starting snake"
    );

    let mut config = GameConfig::new(cli.width, cli.height);
    if cli.lenient_walls {
        config.wall_policy = WallPolicy::Ignore;
    }
    if cli.no_self_collision {
        config.self_collision_ends_round = false;
    }
    if cli.allow_reversal {
        config.reject_reversal = false;
    }

    let mut app = App::new(config, cli.speed);
    app.run().await
}
