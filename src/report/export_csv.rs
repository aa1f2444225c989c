//! CSV export of raw batch outcomes: one `trial,wounds` row per trial, trials numbered from 1.

use std::io::Write;

use serde::Serialize;

use crate::combat::TrialOutcome;

#[derive(Debug, Serialize)]
struct OutcomeRow {
    trial: usize,
    wounds: TrialOutcome,
}

pub fn write_outcomes_csv<W: Write>(writer: W, outcomes: &[TrialOutcome]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (index, &wounds) in outcomes.iter().enumerate() {
        csv_writer.serialize(OutcomeRow {
            trial: index + 1,
            wounds,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
