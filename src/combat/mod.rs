pub mod dice;
pub mod difficulty;
pub mod engine;
pub mod rng;
pub mod stages;

pub use dice::{roll_dice, DiceSource, FaceConvention, ScriptedDice, D6};
pub use difficulty::derive_difficulty;
pub use engine::{
    run_batch, run_batch_seeded, run_seeded_trial, run_trial, trace_batch_seeded,
    trace_seeded_trial, trace_trial, trial_seed, BatchResult, TrialOutcome, TrialParameters,
    TrialTrace, MAX_RUN_NUMBER,
};
pub use rng::Rng;
pub use stages::{apply_save, count_successes, Stage};
