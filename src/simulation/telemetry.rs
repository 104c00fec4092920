//! Bounded-memory history of the population for selection analysis.
//!
//! Per-creature histories live only as long as the creature does: every call
//! to [`Telemetry::write_stats`] drops entries of ids that are no longer alive.
//! Population-level series are ring buffers of fixed capacity.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use super::creature::{Creature, CreatureId};

/// Energy samples kept per creature.
pub const ENERGY_HISTORY_LEN: usize = 1000;
/// Population size samples kept.
pub const POPULATION_HISTORY_LEN: usize = 1500;
/// Death records kept.
pub const DEATH_STATS_LEN: usize = 200;
/// Columns of [`Telemetry::death_stats_array`].
pub const DEATH_STAT_COLUMNS: usize = 6;

/// Kind of a discrete per-creature event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Took a bite of food; value is the nutrition taken.
    EatFood,
    /// Produced a child; `other` is the child's id.
    CreateChild,
    /// Bit another creature; value is the energy gained, `other` the victim.
    BiteCreature,
    /// Was bitten; value is the energy lost, `other` the biter.
    Bitten,
    /// Move rejected by a wall or the grid edge; value is the energy lost.
    WallCollision,
}

/// One entry of a creature's event log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// Creature the event belongs to.
    pub creature_id: CreatureId,
    /// Tick at which it happened.
    pub tick: u64,
    /// What happened.
    pub kind: EventKind,
    /// Kind-specific amount.
    pub value: f32,
    /// The other creature involved, if any.
    #[serde(default)]
    pub other: Option<CreatureId>,
}

/// Summary of a creature at the moment it died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathStat {
    /// Creature id.
    pub id: CreatureId,
    /// Lineage depth.
    pub generation: u32,
    /// Age in ticks at death.
    pub age_at_death: u32,
    /// First three birth ages, zero-padded.
    pub reprod_ages: [u32; 3],
}

impl DeathStat {
    /// Captures a creature's death record.
    pub fn of(creature: &Creature) -> Self {
        let mut reprod_ages = [0; 3];
        for (slot, &age) in reprod_ages.iter_mut().zip(&creature.birth_ages) {
            *slot = age;
        }
        Self {
            id: creature.id,
            generation: creature.generation,
            age_at_death: creature.age,
            reprod_ages,
        }
    }
}

/// Recorder of energy, events, population size and deaths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Telemetry {
    enabled: bool,
    energy_history: HashMap<CreatureId, VecDeque<f32>>,
    events_log: HashMap<CreatureId, Vec<HistoryEvent>>,
    population_size: VecDeque<usize>,
    death_stats: VecDeque<DeathStat>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new(true)
    }
}

fn push_bounded<T>(buffer: &mut VecDeque<T>, item: T, capacity: usize) {
    buffer.push_back(item);
    while buffer.len() > capacity {
        buffer.pop_front();
    }
}

impl Telemetry {
    /// Creates an empty recorder.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            energy_history: HashMap::new(),
            events_log: HashMap::new(),
            population_size: VecDeque::with_capacity(POPULATION_HISTORY_LEN),
            death_stats: VecDeque::with_capacity(DEATH_STATS_LEN),
        }
    }

    /// Whether anything is being recorded.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turns recording on or off. Turning it off discards all history.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.clear();
        }
        self.enabled = enabled;
    }

    /// Discards all recorded history.
    pub fn clear(&mut self) {
        self.energy_history.clear();
        self.events_log.clear();
        self.population_size.clear();
        self.death_stats.clear();
    }

    /// Records one tick: an energy sample per creature and the population size.
    ///
    /// Histories of creatures missing from `creatures` are purged.
    pub fn write_stats(&mut self, creatures: &[Creature]) {
        if !self.enabled {
            return;
        }

        for creature in creatures {
            let history = self
                .energy_history
                .entry(creature.id)
                .or_insert_with(|| VecDeque::with_capacity(ENERGY_HISTORY_LEN));
            push_bounded(history, creature.energy, ENERGY_HISTORY_LEN);
        }
        push_bounded(
            &mut self.population_size,
            creatures.len(),
            POPULATION_HISTORY_LEN,
        );

        let live: HashSet<CreatureId> = creatures.iter().map(|c| c.id).collect();
        self.energy_history.retain(|id, _| live.contains(id));
        self.events_log.retain(|id, _| live.contains(id));
    }

    /// Appends an event to a creature's log.
    pub fn log_event(&mut self, creature_id: CreatureId, tick: u64, kind: EventKind, value: f32) {
        self.push_event(HistoryEvent {
            creature_id,
            tick,
            kind,
            value,
            other: None,
        });
    }

    /// Appends an event that involves a second creature.
    pub fn log_interaction(
        &mut self,
        creature_id: CreatureId,
        other: CreatureId,
        tick: u64,
        kind: EventKind,
        value: f32,
    ) {
        self.push_event(HistoryEvent {
            creature_id,
            tick,
            kind,
            value,
            other: Some(other),
        });
    }

    fn push_event(&mut self, event: HistoryEvent) {
        if !self.enabled {
            return;
        }
        self.events_log
            .entry(event.creature_id)
            .or_default()
            .push(event);
    }

    /// Records a death, evicting the oldest record beyond [`DEATH_STATS_LEN`].
    pub fn record_death(&mut self, creature: &Creature) {
        if !self.enabled {
            return;
        }
        push_bounded(
            &mut self.death_stats,
            DeathStat::of(creature),
            DEATH_STATS_LEN,
        );
    }

    /// Energy samples of a creature, oldest first. Empty for unknown ids.
    pub fn creature_energy_history(&self, id: CreatureId) -> Vec<f32> {
        self.energy_history
            .get(&id)
            .map(|h| h.iter().copied().collect())
            .unwrap_or_default()
    }

    /// All events of a creature in the order they were logged.
    pub fn creature_events(&self, id: CreatureId) -> &[HistoryEvent] {
        self.events_log.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Events of one kind for a creature.
    pub fn creature_events_by_type(&self, id: CreatureId, kind: EventKind) -> Vec<HistoryEvent> {
        self.creature_events(id)
            .iter()
            .filter(|e| e.kind == kind)
            .copied()
            .collect()
    }

    /// Number of events of a creature, optionally restricted to one kind.
    pub fn events_count(&self, id: CreatureId, kind: Option<EventKind>) -> usize {
        let events = self.creature_events(id);
        match kind {
            Some(kind) => events.iter().filter(|e| e.kind == kind).count(),
            None => events.len(),
        }
    }

    /// Death records, oldest first.
    pub fn death_stats(&self) -> impl Iterator<Item = &DeathStat> {
        self.death_stats.iter()
    }

    /// Death records as a `deaths × 6` matrix with columns
    /// `id, generation, age_at_death, reprod_age_0, reprod_age_1, reprod_age_2`.
    pub fn death_stats_array(&self) -> Array2<u64> {
        let mut array = Array2::zeros((self.death_stats.len(), DEATH_STAT_COLUMNS));
        for (mut row, stat) in array.rows_mut().into_iter().zip(&self.death_stats) {
            row[0] = stat.id;
            row[1] = u64::from(stat.generation);
            row[2] = u64::from(stat.age_at_death);
            for (i, &age) in stat.reprod_ages.iter().enumerate() {
                row[3 + i] = u64::from(age);
            }
        }
        array
    }

    /// Population size per recorded tick, oldest first.
    pub fn population_size_history(&self) -> Vec<usize> {
        self.population_size.iter().copied().collect()
    }

    /// Mean age at death for every generation present in the death records.
    pub fn mean_age_at_death_by_generation(&self) -> BTreeMap<u32, f32> {
        let mut sums: BTreeMap<u32, (u64, u32)> = BTreeMap::new();
        for stat in &self.death_stats {
            let entry = sums.entry(stat.generation).or_insert((0, 0));
            entry.0 += u64::from(stat.age_at_death);
            entry.1 += 1;
        }
        sums.into_iter()
            .map(|(generation, (sum, count))| (generation, sum as f32 / count as f32))
            .collect()
    }
}
