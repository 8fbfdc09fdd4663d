//! Fitted models and the on-disk artifact format.
//!
//! Every artifact is a bincode-encoded envelope of
//! `{ format_version, task, run, payload }`. The header is decoded and checked
//! before the payload so a stale or misplaced file is reported as such
//! instead of as a garbled decode error.

pub mod scaler;
pub mod svm;

use crate::error::{Error, Result};
use crate::task::Task;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use scaler::StandardScaler;
pub use svm::{ClassifierParams, Evaluation, Kernel, SvmClassifier};

/// Bumped whenever a payload layout changes.
pub const FORMAT_VERSION: u16 = 1;

#[derive(Serialize, Deserialize)]
struct Header {
    format_version: u16,
    task: Task,
    /// Identifier of the training run that produced the payload.
    run: String,
}

#[derive(Serialize, Deserialize)]
struct Artifact<P> {
    header: Header,
    payload: P,
}

/// A decoded payload and the training run it came from.
#[derive(Debug)]
pub struct Loaded<P> {
    pub run: String,
    pub payload: P,
}

pub fn encode<S: Serialize>(task: Task, run: &str, payload: &S) -> Result<Vec<u8>> {
    Ok(bincode::serialize(&Artifact {
        header: Header {
            format_version: FORMAT_VERSION,
            task,
            run: run.to_string(),
        },
        payload,
    })?)
}

/// Bytes written to a temporary sibling of their destination and not yet
/// visible under it. Dropped without `commit`, the temporary file is removed.
pub struct Staged {
    tmp: PathBuf,
    path: PathBuf,
}

impl Staged {
    /// Writes `bytes` next to `path`, creating parent directories.
    pub fn write(path: &Path, bytes: &[u8]) -> Result<Staged> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|why| Error::io(parent, why))?;
        }
        let tmp = path.with_extension("tmp");
        if let Err(why) = fs::write(&tmp, bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(Error::io(&tmp, why));
        }
        debug!("Staged {} bytes for {}", bytes.len(), path.display());
        Ok(Staged {
            tmp,
            path: path.to_path_buf(),
        })
    }

    /// Renames the staged bytes into place.
    pub fn commit(self) -> Result<()> {
        fs::rename(&self.tmp, &self.path).map_err(|why| Error::io(&self.path, why))
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        // no-op after a successful commit
        let _ = fs::remove_file(&self.tmp);
    }
}

pub fn load<D: DeserializeOwned>(task: Task, path: &Path) -> Result<Loaded<D>> {
    let bin = fs::read(path).map_err(|why| Error::io(path, why))?;

    let header: Header = bincode::deserialize(&bin)?;
    if header.format_version != FORMAT_VERSION {
        return Err(Error::ArtifactVersion {
            path: path.to_path_buf(),
            found: header.format_version,
            expected: FORMAT_VERSION,
        });
    }
    if header.task != task {
        return Err(Error::ArtifactTask {
            path: path.to_path_buf(),
            found: header.task,
            expected: task,
        });
    }

    let artifact: Artifact<D> = bincode::deserialize(&bin)?;
    Ok(Loaded {
        run: artifact.header.run,
        payload: artifact.payload,
    })
}
