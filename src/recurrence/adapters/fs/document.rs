//! Whole-document JSON persistence inside a capability directory.

use cap_std::fs_utf8::Dir;
use serde::{Serialize, de::DeserializeOwned};
use std::io;

/// Reads `file_name` as JSON, returning `T::default()` when it is absent.
pub(super) fn read_document<T>(dir: &Dir, file_name: &str) -> io::Result<T>
where
    T: DeserializeOwned + Default,
{
    match dir.read_to_string(file_name) {
        Ok(contents) if contents.trim().is_empty() => Ok(T::default()),
        Ok(contents) => serde_json::from_str(&contents).map_err(io::Error::other),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(T::default()),
        Err(err) => Err(err),
    }
}

/// Replaces `file_name` with the JSON encoding of `value`.
pub(super) fn write_document<T>(dir: &Dir, file_name: &str, value: &T) -> io::Result<()>
where
    T: Serialize,
{
    let encoded = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
    let staging = format!(".{file_name}.tmp");
    dir.write(&staging, encoded)?;
    dir.rename(&staging, dir, file_name)
}
