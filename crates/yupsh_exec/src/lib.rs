mod command;
mod error;
mod pipeline;

#[cfg(test)]
mod tests;

pub use command::Command;
pub use error::PipelineError;
pub use pipeline::{exec, pipe, Pipeline};
