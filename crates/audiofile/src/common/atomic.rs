//! Whole-file replacement through a temporary file.
//!
//! The target path always holds either the old or the new contents.
//! The temporary file lives next to the target, so the final rename
//! never crosses a filesystem boundary.

use std::{
	fs::File,
	io::Write,
	path::{Path, PathBuf},
};
use tracing::{debug, trace};

fn parent_dir(path: &Path) -> PathBuf {
	match path.parent() {
		Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
		_ => PathBuf::from("."),
	}
}

/// Replace the contents of `path` with whatever `write` produces.
///
/// `write` receives a fresh temporary file. If it (or anything after it)
/// fails, the temporary file is deleted and `path` is left untouched.
pub fn atomic_write_with<F>(path: &Path, write: F) -> Result<(), std::io::Error>
where
	F: FnOnce(&mut File) -> Result<(), std::io::Error>,
{
	let mut tmp = tempfile::NamedTempFile::new_in(parent_dir(path))?;
	trace!(message = "Writing temporary file", tmp = ?tmp.path());

	write(tmp.as_file_mut())?;
	tmp.as_file_mut().flush()?;
	tmp.as_file().sync_all()?;

	// Keep the original file's permissions
	if let Ok(meta) = std::fs::metadata(path) {
		tmp.as_file().set_permissions(meta.permissions())?;
	}

	tmp.persist(path).map_err(|e| e.error)?;
	debug!(message = "Atomically replaced file", path = ?path);
	return Ok(());
}

/// Replace the contents of `path` with `data`.
pub fn atomic_replace(path: &Path, data: &[u8]) -> Result<(), std::io::Error> {
	atomic_write_with(path, |f| f.write_all(data))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dir_entries(dir: &Path) -> usize {
		std::fs::read_dir(dir).unwrap().count()
	}

	#[test]
	fn replace_existing() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("song.mp3");
		std::fs::write(&path, b"old contents").unwrap();

		atomic_replace(&path, b"new").unwrap();
		assert_eq!(std::fs::read(&path).unwrap(), b"new");
		assert_eq!(dir_entries(dir.path()), 1);
	}

	#[test]
	fn failed_write_leaves_original() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("song.flac");
		std::fs::write(&path, b"original").unwrap();

		let e = atomic_write_with(&path, |f| {
			f.write_all(b"partial")?;
			Err(std::io::Error::new(
				std::io::ErrorKind::Other,
				"simulated failure",
			))
		})
		.unwrap_err();

		assert_eq!(e.to_string(), "simulated failure");
		assert_eq!(std::fs::read(&path).unwrap(), b"original");

		// The temporary file is gone
		assert_eq!(dir_entries(dir.path()), 1);
	}

	#[test]
	fn missing_parent_fails() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("no-such-dir").join("song.ogg");
		assert!(atomic_replace(&path, b"data").is_err());
	}
}
