//! Consumer-side views of a batch: summaries and CSV export. The engine itself
//! never aggregates.

pub mod export_csv;
pub mod summary;

pub use export_csv::write_outcomes_csv;
pub use summary::BatchSummary;
