//! Gridsnake - a tick-driven terminal snake game
//!
//! This library provides:
//! - Core simulation logic (game module), free of any I/O
//! - Keyboard input mapping (input module)
//! - TUI rendering (render module)
//! - Session wall-clock for the HUD (metrics module)
//! - The tick-loop driver tying them together (app module)

pub mod app;
pub mod game;
pub mod input;
pub mod metrics;
pub mod render;
