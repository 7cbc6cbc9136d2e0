pub mod run;

pub use run::{RunConfig, RunConfigSource, SourceConfig};
