//! File-backed session state
//!
//! One JSON document per session under the state directory. Every
//! read-modify-write holds an exclusive OS lock on the session file so that
//! overlapping hook invocations for the same session serialize.

use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::{SessionId, SessionState, StateBackend, StoreError};

/// File name prefix for session state records
pub const STATE_FILE_PREFIX: &str = "security_warnings_state_";

const STATE_FILE_SUFFIX: &str = ".json";

/// Reopen attempts when a prune unlinks the file we were waiting on
const OPEN_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of a session's record
    pub fn path_for(&self, session: &SessionId) -> PathBuf {
        self.dir.join(format!(
            "{}{}{}",
            STATE_FILE_PREFIX,
            session.file_stem(),
            STATE_FILE_SUFFIX
        ))
    }
}

impl StateBackend for FileBackend {
    fn read(&self, session: &SessionId) -> Result<Option<SessionState>, StoreError> {
        let path = self.path_for(session);
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        FileExt::lock_shared(&file)?;
        let contents = read_all(&mut file)?;
        Ok(parse_state(&contents, &path))
    }

    fn update(
        &self,
        session: &SessionId,
        apply: &mut dyn FnMut(&mut SessionState) -> bool,
    ) -> Result<(), StoreError> {
        let path = self.path_for(session);
        let mut file = open_locked(&path)?;
        let contents = read_all(&mut file)?;

        let mut state = parse_state(&contents, &path).unwrap_or_else(|| SessionState::new(session));
        if state.session_id.is_empty() {
            state.session_id = session.as_str().to_string();
        }

        if apply(&mut state) {
            let json = serde_json::to_vec_pretty(&state)?;
            file.set_len(0)?;
            file.seek(SeekFrom::Start(0))?;
            file.write_all(&json)?;
            file.flush()?;
        }
        Ok(())
    }

    fn prune(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            let is_state_file = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(STATE_FILE_PREFIX) && n.ends_with(STATE_FILE_SUFFIX));
            if !is_state_file {
                continue;
            }

            match prune_one(&path, cutoff) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipping state file during prune"),
            }
        }
        Ok(removed)
    }
}

/// Remove one state file if it is stale and not held by another invocation
fn prune_one(path: &Path, cutoff: DateTime<Utc>) -> io::Result<bool> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    if FileExt::try_lock_exclusive(&file).is_err() {
        return Ok(false);
    }

    let contents = read_all(&mut file)?;
    let last_write = match serde_json::from_slice::<SessionState>(&contents) {
        Ok(SessionState {
            updated_at: Some(t), ..
        }) => t,
        _ => DateTime::<Utc>::from(file.metadata()?.modified()?),
    };

    if last_write >= cutoff {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}

fn open_locked(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    for _ in 0..OPEN_ATTEMPTS {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        FileExt::lock_exclusive(&file)?;
        if still_linked(&file, path)? {
            return Ok(file);
        }
        tracing::debug!(path = %path.display(), "state file pruned while waiting for lock, reopening");
    }
    Err(io::Error::other(format!(
        "{} kept disappearing while locking",
        path.display()
    )))
}

/// Whether the locked handle is still the file named by `path`
#[cfg(unix)]
fn still_linked(file: &File, path: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let held = file.metadata()?;
    match fs::metadata(path) {
        Ok(current) => Ok(current.dev() == held.dev() && current.ino() == held.ino()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(not(unix))]
fn still_linked(_file: &File, path: &Path) -> io::Result<bool> {
    Ok(path.exists())
}

fn read_all(file: &mut File) -> io::Result<Vec<u8>> {
    let mut contents = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Parse a record; unreadable bytes count as no record
fn parse_state(contents: &[u8], path: &Path) -> Option<SessionState> {
    if contents.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(contents) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt session state");
            None
        }
    }
}
