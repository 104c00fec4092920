//! # Gridlife - Raycast Vision Artificial Life
//!
//! A tick-based simulation of creatures on a walled 2D grid. Each creature
//! sees through raycast vision, decides with a small neural network and
//! reproduces with mutation at its birth ages.
//!
//! ## Features
//!
//! - Raycast vision producing a 45-value colour vector per creature
//! - Feed-forward brains (`45 → 50 → 10 → 3`) evaluated in one batched pass
//! - Energy, aging, biting and reproduction with mutation
//! - Bounded-memory telemetry for selection analysis
//! - Seeded, reproducible worlds and hand-laid scenarios
//!
//! ## Core Modules
//!
//! - [`simulation::world`] - Grid, population and the tick loop
//! - [`simulation::vision`] - Raycast vision
//! - [`simulation::brain`] - Neural network and batched forward pass
//! - [`simulation::creature`] - Creature lifecycle and reproduction
//! - [`simulation::telemetry`] - Population history

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network implementation for creature brains.
    pub mod brain;
    /// Parameters, telemetry and debug state owned by a world.
    pub mod context;
    /// Creature state, lifecycle and reproduction.
    pub mod creature;
    /// Error types.
    pub mod error;
    /// Food items creatures bite for energy.
    pub mod food;
    /// Geometric helpers.
    pub mod geometric_utils;
    /// Cell grid.
    pub mod grid;
    /// Simulation parameters.
    pub mod params;
    /// Hand-laid worlds for behavioural checks.
    pub mod scenario;
    /// Population history recorder.
    pub mod telemetry;
    /// Raycast vision.
    pub mod vision;
    /// The world and its tick loop.
    pub mod world;
}

pub use simulation::error::{Result, SimError};
