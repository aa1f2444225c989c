//! Request decoding, field validation and response shaping shared by the HTTP
//! routes and the CLI.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::combat::{
    derive_difficulty, trace_batch_seeded, FaceConvention, Rng, TrialOutcome, TrialParameters,
    TrialTrace, MAX_RUN_NUMBER,
};
use crate::parallel::BatchRunner;
use crate::report::BatchSummary;

/// Wire form of a simulation request. Every numeric field is optional and
/// signed so that missing or out-of-range values reach validation instead of
/// failing the JSON decode.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub strength: Option<i64>,
    pub endurance: Option<i64>,
    pub dice_number: Option<i64>,
    pub touch_difficulty: Option<i64>,
    pub armor_save: Option<i64>,
    pub invu_save: Option<i64>,
    pub run_number: Option<i64>,
    pub seed: Option<u64>,
    #[serde(default)]
    pub legacy_faces: bool,
    /// Also return the per-stage counts of every trial.
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DifficultyQuery {
    pub strength: Option<i64>,
    pub endurance: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldViolation {
    #[error("field '{field}' is required")]
    Missing { field: &'static str },

    #[error("field '{field}' must be at least {min}, got {actual}")]
    BelowMinimum {
        field: &'static str,
        min: i64,
        actual: i64,
    },

    #[error("field '{field}' must be at most {max}, got {actual}")]
    AboveMaximum {
        field: &'static str,
        max: i64,
        actual: i64,
    },
}

impl FieldViolation {
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::BelowMinimum { field, .. }
            | Self::AboveMaximum { field, .. } => *field,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid JSON body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("validation failed: {} issue(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("simulation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationErrorResponse {
    /// Groups violations by field, keeping the order fields were checked in.
    pub fn from_violations(violations: &[FieldViolation]) -> Self {
        let mut errors: Vec<ValidationIssue> = Vec::new();
        for violation in violations {
            let message = violation.to_string();
            match errors.iter_mut().find(|issue| issue.field == violation.field()) {
                Some(issue) => issue.messages.push(message),
                None => errors.push(ValidationIssue {
                    field: violation.field(),
                    messages: vec![message],
                }),
            }
        }
        Self {
            status: "error",
            message: "Validation failed",
            errors,
        }
    }
}

/// Bounds for one request field. A required field treats an explicit zero as
/// missing; an optional field defaults to zero.
#[derive(Debug, Clone, Copy)]
struct FieldRule {
    field: &'static str,
    required: bool,
    min: i64,
    max: i64,
}

const U32_MAX: i64 = u32::MAX as i64;

const STRENGTH: FieldRule = FieldRule {
    field: "strength",
    required: true,
    min: 1,
    max: U32_MAX,
};
const ENDURANCE: FieldRule = FieldRule {
    field: "endurance",
    required: true,
    min: 1,
    max: U32_MAX,
};
const DICE_NUMBER: FieldRule = FieldRule {
    field: "diceNumber",
    required: true,
    min: 1,
    max: U32_MAX,
};
const TOUCH_DIFFICULTY: FieldRule = FieldRule {
    field: "touchDifficulty",
    required: true,
    min: 2,
    max: 6,
};
const ARMOR_SAVE: FieldRule = FieldRule {
    field: "armorSave",
    required: false,
    min: 0,
    max: 6,
};
const INVU_SAVE: FieldRule = FieldRule {
    field: "invuSave",
    required: false,
    min: 0,
    max: 6,
};
const RUN_NUMBER: FieldRule = FieldRule {
    field: "runNumber",
    required: true,
    min: 1,
    max: MAX_RUN_NUMBER as i64,
};

impl FieldRule {
    fn check(&self, value: Option<i64>) -> Result<i64, FieldViolation> {
        let value = match value {
            Some(0) | None if self.required => {
                return Err(FieldViolation::Missing { field: self.field })
            }
            Some(v) => v,
            None => 0,
        };
        if value < self.min {
            return Err(FieldViolation::BelowMinimum {
                field: self.field,
                min: self.min,
                actual: value,
            });
        }
        if value > self.max {
            return Err(FieldViolation::AboveMaximum {
                field: self.field,
                max: self.max,
                actual: value,
            });
        }
        Ok(value)
    }
}

/// Collects every violation instead of stopping at the first.
#[derive(Debug, Default)]
struct Checker {
    violations: Vec<FieldViolation>,
}

impl Checker {
    /// Returns 0 for a rejected field; the caller discards the values when any field fails.
    fn take(&mut self, rule: FieldRule, value: Option<i64>) -> i64 {
        rule.check(value).unwrap_or_else(|violation| {
            self.violations.push(violation);
            0
        })
    }

    fn finish<T>(self, value: T) -> Result<T, Vec<FieldViolation>> {
        if self.violations.is_empty() {
            Ok(value)
        } else {
            Err(self.violations)
        }
    }
}

/// A request that passed validation, with the wound difficulty already derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub strength: u32,
    pub endurance: u32,
    pub params: TrialParameters,
    pub seed: Option<u64>,
    pub trace: bool,
}

pub fn validate_request(
    request: &SimulateRequest,
) -> Result<ValidatedRequest, Vec<FieldViolation>> {
    let mut checker = Checker::default();
    let strength = checker.take(STRENGTH, request.strength) as u32;
    let endurance = checker.take(ENDURANCE, request.endurance) as u32;
    let dice_number = checker.take(DICE_NUMBER, request.dice_number) as u32;
    let touch_difficulty = checker.take(TOUCH_DIFFICULTY, request.touch_difficulty) as u8;
    let armor_save = checker.take(ARMOR_SAVE, request.armor_save) as u8;
    let invu_save = checker.take(INVU_SAVE, request.invu_save) as u8;
    let run_number = checker.take(RUN_NUMBER, request.run_number) as u32;

    checker.finish(())?;

    Ok(ValidatedRequest {
        strength,
        endurance,
        params: TrialParameters {
            dice_number,
            touch_difficulty,
            hurt_difficulty: derive_difficulty(strength, endurance),
            armor_save,
            invu_save,
            run_number,
            faces: FaceConvention::from_legacy_flag(request.legacy_faces),
        },
        seed: request.seed,
        trace: request.trace,
    })
}

pub fn decode_request(body: &str) -> Result<ValidatedRequest, ApiError> {
    let request: SimulateRequest = serde_json::from_str(body)?;
    validate_request(&request).map_err(|violations| {
        tracing::warn!(issues = violations.len(), "rejected simulate request");
        ApiError::Validation(violations)
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    pub status: &'static str,
    pub batch_id: Uuid,
    pub strength: u32,
    pub endurance: u32,
    pub params: TrialParameters,
    pub seed: u64,
    pub results: Vec<TrialOutcome>,
    pub summary: BatchSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traces: Option<Vec<TrialTrace>>,
}

/// Run the batch for a validated request. Without a caller seed one is drawn
/// from entropy and echoed back so the batch can be replayed.
///
/// Traced batches run on the calling thread; their outcomes are the same as
/// the untraced batch for the seed.
pub fn simulate(
    request: &ValidatedRequest,
    runner: &BatchRunner,
) -> Result<SimulateResponse, ApiError> {
    let seed = request
        .seed
        .unwrap_or_else(|| Rng::from_entropy().next_u64());
    let batch_id = Uuid::new_v4();

    tracing::debug!(
        %batch_id,
        seed,
        dice = request.params.dice_number,
        touch = request.params.touch_difficulty,
        hurt = request.params.hurt_difficulty,
        armor = request.params.armor_save,
        invu = request.params.invu_save,
        runs = request.params.run_number,
        trace = request.trace,
        "batch started"
    );

    let (results, traces) = if request.trace {
        let traces = trace_batch_seeded(&request.params, seed);
        let results: Vec<TrialOutcome> = traces.iter().map(TrialTrace::outcome).collect();
        (results, Some(traces))
    } else {
        (runner.run(&request.params, seed)?, None)
    };
    let summary = BatchSummary::from_outcomes(&results);

    tracing::debug!(%batch_id, mean = summary.mean, "batch finished");

    Ok(SimulateResponse {
        status: "ok",
        batch_id,
        strength: request.strength,
        endurance: request.endurance,
        params: request.params,
        seed,
        results,
        summary,
        traces,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DifficultyResponse {
    pub strength: u32,
    pub endurance: u32,
    pub difficulty: u8,
}

pub fn difficulty_for(
    query: &DifficultyQuery,
) -> Result<DifficultyResponse, Vec<FieldViolation>> {
    let mut checker = Checker::default();
    let strength = checker.take(STRENGTH, query.strength) as u32;
    let endurance = checker.take(ENDURANCE, query.endurance) as u32;
    checker.finish(DifficultyResponse {
        strength,
        endurance,
        difficulty: derive_difficulty(strength, endurance),
    })
}

/// Page body listing every outcome in trial order:
/// `<h1>Here are the results of all the runs : [a b c]</h1>`.
pub fn render_results_html(results: &[TrialOutcome]) -> String {
    let joined = results
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    format!("<h1>Here are the results of all the runs : [{joined}]</h1>")
}

pub fn health_payload() -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "service": "woundsim-api",
        "version": env!("CARGO_PKG_VERSION")
    })
}
