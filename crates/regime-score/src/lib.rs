//! Institutional score engine.
//!
//! Combines trend, breadth and volatility conditions across three
//! instruments into a bounded score, classifies the score into a market
//! regime and replays the engine over recent history:
//! - `engine`: five weighted conditions evaluated at one bar
//! - `regime`: score bands with their suggested equity exposure
//! - `backfill`: lazy score history for charting
//! - `pipeline`: one full run from price series to a report

pub mod backfill;
pub mod engine;
pub mod pipeline;
pub mod regime;
mod report;

pub use backfill::{HistoryBackfill, HistoryPoint, DEFAULT_HISTORY_LEN};
pub use engine::{
    Condition, ConditionOutcome, IndicatorSet, ScoreEngine, ScoreInputs, ScoreParams, ScoreSample,
};
pub use pipeline::{Assessment, DashboardReport, Pipeline, PipelineError};
pub use regime::{classify, Regime};
