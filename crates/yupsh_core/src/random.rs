use std::{fs::File, io::Read, path::Path};

use rand::{rngs::StdRng, SeedableRng};

use crate::{CommandError, CommandResult};

/// Number of bytes drawn from a random source file.
const SEED_LEN: usize = 32;

/// Returns a generator for an optional seed, or an OS-seeded one.
pub(crate) fn from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Returns a generator seeded by the leading bytes of a file.
///
/// The same file contents always produce the same sequence.
pub(crate) fn from_source_file(path: &Path) -> CommandResult<StdRng> {
    let mut file = File::open(path).map_err(|error| CommandError::input(path, error))?;

    let mut seed = [0u8; SEED_LEN];
    file.read_exact(&mut seed).map_err(|error| match error.kind() {
        std::io::ErrorKind::UnexpectedEof => CommandError::input(
            path,
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "end of file"),
        ),
        _ => CommandError::input(path, error),
    })?;

    tracing::debug!(path = %path.display(), "seeded random generator from file");
    Ok(StdRng::from_seed(seed))
}
