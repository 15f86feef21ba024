pub mod cli;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod plotting;
pub mod preset;
pub mod tools;

pub use error::{PipelineError, Result};
pub use io::{parse_depth, parse_flagstat, parse_idxstats};
pub use pipeline::{OutputLayout, Pipeline, PipelineConfig, RunOutputs, Step};
pub use preset::Preset;
