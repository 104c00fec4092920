//! Food items that creatures bite for energy.

use serde::{Deserialize, Serialize};

/// A food item sitting on one grid cell.
///
/// Each bite removes a fixed chunk of nutrition; the item disappears once
/// nothing is left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Nutrition remaining.
    pub nutrition: f32,
}

impl Food {
    /// Creates a food item.
    pub fn new(x: f32, y: f32, nutrition: f32) -> Self {
        Self { x, y, nutrition }
    }

    /// Checks if this food item has been fully consumed.
    pub fn is_exhausted(&self) -> bool {
        self.nutrition <= 0.0
    }

    /// Removes up to `chunk` nutrition and returns the amount actually taken.
    pub fn take_bite(&mut self, chunk: f32) -> f32 {
        let taken = chunk.min(self.nutrition).max(0.0);
        self.nutrition -= taken;
        taken
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn bites_never_overdraw() {
        let mut food = Food::new(1.0, 1.0, 0.25);
        assert_eq!(food.take_bite(0.1), 0.1);
        assert_eq!(food.take_bite(0.1), 0.1);
        assert!((food.take_bite(0.1) - 0.05).abs() < 1e-6);
        assert!(food.is_exhausted());
        assert_eq!(food.take_bite(0.1), 0.0);
    }
}
