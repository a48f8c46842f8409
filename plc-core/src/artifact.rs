//! Reading and writing the text artifacts handed from one stage to the next.
//!
//! Serialization code never touches the filesystem directly: it writes into
//! whatever sink it is given, and [`write_artifact`] is the one place that
//! turns a path into such a sink.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read artifact '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot write artifact '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

pub fn read_artifact<P: AsRef<Path>>(path: P) -> Result<String, ArtifactError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "read artifact");
    Ok(content)
}

/// Creates (or truncates) `path` and hands a buffered writer to `write`.
///
/// The artifact is flushed before returning, so a successful return means the
/// whole artifact reached the file.
pub fn write_artifact<P, F>(path: P, write: F) -> Result<(), ArtifactError>
where
    P: AsRef<Path>,
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let path = path.as_ref();
    let to_error = |source| ArtifactError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).map_err(to_error)?;
    writer.flush().map_err(to_error)?;

    tracing::debug!(path = %path.display(), "wrote artifact");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("plc-core-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_write_then_read_artifact() {
        let path = scratch_path("artifact.txt");
        write_artifact(&path, |w| writeln!(w, "PROGRAM (line 1) - 0 statements")).unwrap();

        let content = read_artifact(&path).unwrap();
        assert_eq!(content, "PROGRAM (line 1) - 0 statements\n");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_artifact_is_read_error() {
        let path = scratch_path("does-not-exist.txt");
        let err = read_artifact(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Read { .. }));
    }
}
