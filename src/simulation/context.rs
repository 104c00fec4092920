//! Shared state handed to the world instead of process-wide singletons.

use std::collections::HashMap;

use super::creature::CreatureId;
use super::params::SimParams;
use super::telemetry::Telemetry;

/// Raycast sample points from the most recent tick, for visual debugging.
#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    /// When false, nothing is kept.
    pub enabled: bool,
    raycast_dots: HashMap<CreatureId, Vec<(f32, f32)>>,
}

impl DebugOverlay {
    /// Replaces the stored sample points. Ignored while disabled.
    pub fn store_raycasts(
        &mut self,
        dots: impl IntoIterator<Item = (CreatureId, Vec<(f32, f32)>)>,
    ) {
        self.raycast_dots.clear();
        if self.enabled {
            self.raycast_dots.extend(dots);
        }
    }

    /// Sample points of one creature from the last tick.
    pub fn raycast_dots(&self, id: CreatureId) -> &[(f32, f32)] {
        self.raycast_dots.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Parameters, telemetry and debug state of one simulation.
///
/// Built once and owned by the world; separate instances never share state.
#[derive(Debug, Clone, Default)]
pub struct SimulationContext {
    /// Tunable parameters.
    pub params: SimParams,
    /// Population history recorder.
    pub telemetry: Telemetry,
    /// Debug overlay data.
    pub debug: DebugOverlay,
}

impl SimulationContext {
    /// Creates a context with the given parameters and telemetry enabled.
    pub fn new(params: SimParams) -> Self {
        Self {
            params,
            telemetry: Telemetry::default(),
            debug: DebugOverlay::default(),
        }
    }
}
