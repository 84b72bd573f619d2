use serde::{Deserialize, Serialize};

/// What happens when the snake tries to move off the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallPolicy {
    /// Drop the out-of-bounds move; the snake does not advance this tick
    Ignore,
    /// The round becomes terminal
    EndRound,
}

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Behavior on an out-of-bounds move
    pub wall_policy: WallPolicy,
    /// Whether running into the snake's own body ends the round
    pub self_collision_ends_round: bool,
    /// Whether a direction input opposite to the current heading is rejected
    pub reject_reversal: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            wall_policy: WallPolicy::EndRound,
            self_collision_ends_round: true,
            reject_reversal: true,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(5, 5)
    }

    /// Permissive rule set: out-of-bounds moves ignored, no self-collision
    /// check, reversals allowed.
    pub fn lenient(width: usize, height: usize) -> Self {
        Self {
            wall_policy: WallPolicy::Ignore,
            self_collision_ends_round: false,
            reject_reversal: false,
            ..Self::new(width, height)
        }
    }
}
