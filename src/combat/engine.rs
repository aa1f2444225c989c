//! Trial execution: one attack sequence end to end, and the batch driver that
//! repeats it.
//!
//! Trials never read each other's results. A batch runs exactly `run_number`
//! trials in order and returns the raw outcomes; summaries live in
//! [crate::report].

use serde::Serialize;

use crate::combat::dice::{DiceSource, FaceConvention};
use crate::combat::rng::Rng;
use crate::combat::stages::Stage;

/// Upper bound on trials per batch accepted at the request boundary.
pub const MAX_RUN_NUMBER: u32 = 1000;

/// Wounds left after both saves for one trial.
pub type TrialOutcome = u32;

/// Outcomes of a batch in execution order.
pub type BatchResult = Vec<TrialOutcome>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialParameters {
    pub dice_number: u32,
    pub touch_difficulty: u8,
    pub hurt_difficulty: u8,
    pub armor_save: u8,
    pub invu_save: u8,
    pub run_number: u32,
    pub faces: FaceConvention,
}

impl TrialParameters {
    /// Stages in resolution order.
    pub const fn stages(&self) -> [Stage; 4] {
        [
            Stage::Touch {
                difficulty: self.touch_difficulty,
            },
            Stage::Hurt {
                difficulty: self.hurt_difficulty,
            },
            Stage::ArmorSave {
                threshold: self.armor_save,
            },
            Stage::InvulnerableSave {
                threshold: self.invu_save,
            },
        ]
    }
}

/// Count surviving each stage of a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialTrace {
    pub touches: u32,
    pub hurts: u32,
    pub after_armor: u32,
    pub after_invu: u32,
}

impl TrialTrace {
    pub const fn outcome(&self) -> TrialOutcome {
        self.after_invu
    }
}

pub fn run_trial<D: DiceSource + ?Sized>(params: &TrialParameters, dice: &mut D) -> TrialOutcome {
    params
        .stages()
        .into_iter()
        .fold(params.dice_number, |count, stage| {
            stage.apply(count, dice, params.faces)
        })
}

/// Same draws as [run_trial], keeping the intermediate counts.
pub fn trace_trial<D: DiceSource + ?Sized>(params: &TrialParameters, dice: &mut D) -> TrialTrace {
    let [touch, hurt, armor, invu] = params.stages();
    let touches = touch.apply(params.dice_number, dice, params.faces);
    let hurts = hurt.apply(touches, dice, params.faces);
    let after_armor = armor.apply(hurts, dice, params.faces);
    let after_invu = invu.apply(after_armor, dice, params.faces);
    TrialTrace {
        touches,
        hurts,
        after_armor,
        after_invu,
    }
}

pub fn run_batch<D: DiceSource + ?Sized>(params: &TrialParameters, dice: &mut D) -> BatchResult {
    (0..params.run_number)
        .map(|_| run_trial(params, dice))
        .collect()
}

/// Seed of the generator owned by trial `index` of a batch seeded with `seed`.
#[inline]
pub fn trial_seed(seed: u64, index: u32) -> u64 {
    seed.wrapping_add(u64::from(index))
}

pub fn run_seeded_trial(params: &TrialParameters, seed: u64, index: u32) -> TrialOutcome {
    let mut rng = Rng::new(trial_seed(seed, index));
    run_trial(params, &mut rng)
}

pub fn trace_seeded_trial(params: &TrialParameters, seed: u64, index: u32) -> TrialTrace {
    let mut rng = Rng::new(trial_seed(seed, index));
    trace_trial(params, &mut rng)
}

/// Reproducible batch: every trial draws from its own generator, so the output
/// matches [crate::parallel::run_batch_parallel] for the same seed.
pub fn run_batch_seeded(params: &TrialParameters, seed: u64) -> BatchResult {
    (0..params.run_number)
        .map(|index| run_seeded_trial(params, seed, index))
        .collect()
}

/// Per-stage counts for a seeded batch. Outcomes equal [run_batch_seeded] for
/// the same seed.
pub fn trace_batch_seeded(params: &TrialParameters, seed: u64) -> Vec<TrialTrace> {
    (0..params.run_number)
        .map(|index| trace_seeded_trial(params, seed, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::dice::ScriptedDice;

    fn params() -> TrialParameters {
        TrialParameters {
            dice_number: 10,
            touch_difficulty: 4,
            hurt_difficulty: 4,
            armor_save: 0,
            invu_save: 0,
            run_number: 1,
            faces: FaceConvention::Standard,
        }
    }

    #[test]
    fn stages_are_in_resolution_order() {
        let names: Vec<_> = params().stages().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["touch", "hurt", "armor_save", "invulnerable_save"]);
    }

    #[test]
    fn scripted_trial_walks_every_stage() {
        let p = TrialParameters {
            dice_number: 4,
            armor_save: 4,
            invu_save: 5,
            ..params()
        };
        // touch: 6 5 4 1 -> 3; hurt: 6 4 2 -> 2; armor: 1 5 -> 1; invu: 6 -> 0
        let mut dice = ScriptedDice::new([6, 5, 4, 1, 6, 4, 2, 1, 5, 6]);
        let trace = trace_trial(&p, &mut dice);
        assert_eq!(
            trace,
            TrialTrace {
                touches: 3,
                hurts: 2,
                after_armor: 1,
                after_invu: 0,
            }
        );
        assert_eq!(dice.draws(), 10);
    }

    #[test]
    fn trace_and_run_agree_on_the_same_draws() {
        let p = TrialParameters {
            armor_save: 5,
            invu_save: 4,
            ..params()
        };
        let trace = trace_trial(&p, &mut Rng::new(21));
        let outcome = run_trial(&p, &mut Rng::new(21));
        assert_eq!(trace.outcome(), outcome);
    }

    #[test]
    fn batch_has_run_number_outcomes() {
        let p = TrialParameters {
            run_number: 250,
            ..params()
        };
        let results = run_batch(&p, &mut Rng::new(5));
        assert_eq!(results.len(), 250);
        assert!(results.iter().all(|&wounds| wounds <= p.dice_number));
    }

    #[test]
    fn seeded_batches_repeat() {
        let p = TrialParameters {
            run_number: 64,
            ..params()
        };
        assert_eq!(run_batch_seeded(&p, 42), run_batch_seeded(&p, 42));
    }

    #[test]
    fn traced_batch_matches_seeded_batch() {
        let p = TrialParameters {
            run_number: 80,
            armor_save: 5,
            invu_save: 3,
            ..params()
        };
        let traces = trace_batch_seeded(&p, 11);
        let outcomes: Vec<_> = traces.iter().map(TrialTrace::outcome).collect();
        assert_eq!(outcomes, run_batch_seeded(&p, 11));
        assert!(traces
            .iter()
            .all(|t| t.touches <= 10 && t.hurts <= t.touches && t.after_invu <= t.after_armor));
    }

    #[test]
    fn trial_seed_wraps() {
        assert_eq!(trial_seed(u64::MAX, 1), 0);
        assert_eq!(trial_seed(10, 5), 15);
    }
}
