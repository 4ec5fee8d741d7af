pub mod availability;
pub mod catalog;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod export;
pub mod formula;
pub mod http_client;
pub mod logging;
pub mod partition;
pub mod pipeline;
pub mod positions;
pub mod projection;
pub mod source;
pub mod style;
pub mod synthetic;
pub mod table;

pub use defaults::{CellOrigin, LeagueRow, LeagueTable, MetricCell};
pub use error::PipelineError;
pub use pipeline::{AggregateOptions, Aggregation, aggregate};
pub use projection::{PlayerRecord, PlayerTable};
pub use table::{Cell, RawRecord, RawTable};
