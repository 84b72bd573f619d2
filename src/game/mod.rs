//! Core game logic for Snake
//!
//! This module contains all the simulation logic without any I/O or
//! rendering dependencies. The engine is driven entirely from the outside:
//! a timer calls `step()` once per tick, input calls `set_direction()`
//! between ticks, and the renderer reads `snapshot()`.

pub mod config;
pub mod direction;
pub mod engine;
pub mod grid;

// Re-export commonly used types
pub use config::{GameConfig, WallPolicy};
pub use direction::Direction;
pub use engine::{CollisionKind, EngineStatus, GameEngine, Snapshot, StepOutcome};
pub use grid::{Cell, Grid};
