/// Campaign: the ordered run through a level pack.
///
/// A win on any level but the last builds the next one with the score
/// carried over; the timer and every entity start fresh. A loss, or a win
/// on the last level, ends the run.

use tracing::info;

use crate::config::Tuning;
use crate::domain::rules::LevelOutcome;
use super::level::{LevelData, LevelError};
use super::world::WorldState;

/// What follows a finished level.
pub enum Advance {
    NextLevel(WorldState),
    Finished { won: bool, score: u32, seconds_left: u32 },
}

pub struct Campaign {
    levels: Vec<LevelData>,
    tuning: Tuning,
    current: usize,
    /// Score the current level was entered with; `restart` goes back to it.
    entry_score: u32,
}

impl Campaign {
    pub fn new(levels: Vec<LevelData>, tuning: Tuning) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        Ok(Campaign { levels, tuning, current: 0, entry_score: 0 })
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn level_names(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.name.as_str())
    }

    /// New game from level `index` (clamped to the last level), score 0.
    pub fn start(&mut self, index: usize) -> WorldState {
        self.current = index.min(self.levels.len() - 1);
        self.entry_score = 0;
        self.build()
    }

    /// Rebuild the current level from scratch.
    pub fn restart(&mut self) -> WorldState {
        self.build()
    }

    /// Decide what comes after `world`. Call only once the world is finished;
    /// an unfinished world counts as lost.
    pub fn advance(&mut self, world: &WorldState) -> Advance {
        let won = world.outcome() == Some(LevelOutcome::Won);
        let has_next = self.current + 1 < self.levels.len();

        if won && has_next {
            self.current += 1;
            self.entry_score = world.score();
            info!(level = self.current, score = self.entry_score, "advancing to next level");
            return Advance::NextLevel(self.build());
        }

        info!(won, score = world.score(), "campaign finished");
        Advance::Finished { won, score: world.score(), seconds_left: world.seconds_left() }
    }

    fn build(&self) -> WorldState {
        WorldState::from_level(&self.levels[self.current], self.tuning.clone(), self.entry_score)
    }
}
