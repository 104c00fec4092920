//! Creature state, lifecycle and reproduction.

mod creature;
mod reproduction;

pub use creature::*;
pub use reproduction::{BIRTH_AGE_JITTER, dice_birth_ages};
