//! Self-consistency round planning.
//!
//! Expands a round count and judge set into the flat list of judge
//! tasks one evaluation request schedules. Pure function of its
//! inputs; ordering carries no meaning beyond keeping each task
//! paired with its judge identity.

use crate::types::{JudgeId, JudgeTask};

/// Parameters for one evaluation's task plan.
#[derive(Debug, Clone, Copy)]
pub struct RoundPlan {
    /// Number of self-consistency rounds, `1..=10`
    pub rounds: u32,

    /// Temperature of the first round
    pub base_temperature: f64,

    /// Temperature increment per round
    pub temperature_step: f64,
}

impl Default for RoundPlan {
    fn default() -> Self {
        // 0.1, 0.3, 0.5: the ladder averages out per-call sampling
        // noise without drifting into high-temperature territory.
        Self {
            rounds: 3,
            base_temperature: 0.1,
            temperature_step: 0.2,
        }
    }
}

impl RoundPlan {
    /// The temperature used for round `i` (zero-based).
    pub fn temperature(&self, round: u32) -> f64 {
        self.base_temperature + f64::from(round) * self.temperature_step
    }

    /// Expand this plan into `rounds * judges.len()` tasks, each
    /// tagged with its originating judge.
    pub fn tasks(&self, judges: &[JudgeId]) -> Vec<JudgeTask> {
        let mut tasks = Vec::with_capacity(self.rounds as usize * judges.len());
        for round in 0..self.rounds {
            let temperature = self.temperature(round);
            for &judge in judges {
                tasks.push(JudgeTask { judge, temperature });
            }
        }
        tasks
    }
}
