use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SnapshotError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SnapshotError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

/// Overwrites the snapshot with the raw items of the latest search,
/// pretty-printed with four-space indentation.
pub fn write_snapshot(path: &Path, items: &[Value]) -> Result<(), SnapshotError> {
    write_pretty(path, items)
}

/// Serializes into a temp file next to `path`, then renames it over `path`.
/// The previous file stays intact until the new one is complete.
fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(BufWriter::new(temp.as_file()), formatter);
    value.serialize(&mut serializer)?;
    serializer.into_inner().flush()?;

    temp.persist(path).map_err(|e| SnapshotError::Io(e.error))?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Vec<Value>, SnapshotError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
