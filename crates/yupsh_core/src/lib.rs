mod command;
mod context;
mod error;
mod io;
mod random;
mod record;
mod source;
pub mod status;

pub use command::Command;
pub use context::{CancellationToken, ExecutionContext, StageContext};
pub use error::{CommandError, CommandResult};
pub use io::{Io, SharedWriter};
pub use record::{Delimiter, Record, RecordWriter, Records};
pub use source::Source;
