use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::utils::{TranscodeError, TranscodeResult};

/// Lists regular files in `dir` whose extension matches `ext` (case-insensitive),
/// sorted by file name so batches enumerate in a stable order.
pub fn list_files_with_extension(dir: impl AsRef<Path>, ext: &str) -> TranscodeResult<Vec<PathBuf>> {
    let wanted = ext.trim_start_matches('.').to_lowercase();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.to_lowercase() == wanted);
        if matches {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Creates `dir` and its parents; succeeds if it already exists.
pub fn ensure_dir(dir: impl AsRef<Path>) -> TranscodeResult<()> {
    fs::create_dir_all(dir.as_ref()).map_err(|e| {
        TranscodeError::io(format!("Cannot create directory {}: {e}", dir.as_ref().display()))
    })
}

/// Moves `from` to `to`, falling back to copy + delete when a rename is not
/// possible (e.g. across filesystems).
pub fn move_file(from: impl AsRef<Path>, to: impl AsRef<Path>) -> TranscodeResult<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    debug!("Rename failed, copying {} -> {}", from.display(), to.display());
    fs::copy(from, to).map_err(|e| {
        TranscodeError::io(format!("Cannot move {} to {}: {e}", from.display(), to.display()))
    })?;
    fs::remove_file(from).map_err(|e| {
        TranscodeError::io(format!("Moved copy but cannot remove {}: {e}", from.display()))
    })
}

/// Whether `a` and `b` name the same file. Paths are canonicalized where
/// possible; a missing file is resolved through its parent directory.
pub fn same_path(a: &Path, b: &Path) -> bool {
    resolve(a) == resolve(b)
}

fn resolve(path: &Path) -> PathBuf {
    if let Ok(full) = fs::canonicalize(path) {
        return full;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        })
        .map(|dir| dir.join(name))
        .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// Deletes a single file.
pub fn remove_file(path: impl AsRef<Path>) -> TranscodeResult<()> {
    fs::remove_file(path.as_ref())
        .map_err(|e| TranscodeError::io(format!("{e}")))
}

/// Writes `bytes` to `path`. The parent directory must already exist.
pub fn write_bytes(path: impl AsRef<Path>, bytes: &[u8]) -> TranscodeResult<u64> {
    fs::write(path.as_ref(), bytes).map_err(|e| {
        TranscodeError::io(format!("Cannot write {}: {e}", path.as_ref().display()))
    })?;
    Ok(bytes.len() as u64)
}

/// Get the file name of a path as a display string
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Sibling backup directory for `folder`: `<parent>/<folder_name>_<EXT>`.
///
/// Returns `None` when the folder has no usable name (filesystem root).
pub fn backup_dir_for(folder: &Path, source_extension: &str) -> Option<PathBuf> {
    let name = folder.file_name()?.to_string_lossy();
    let parent = folder.parent().unwrap_or_else(|| Path::new(""));
    let ext = source_extension.trim_start_matches('.').to_uppercase();
    Some(parent.join(format!("{name}_{ext}")))
}

/// Formats a byte count for people: `512.0 B`, `12.3 KB`, `4.0 MB`.
pub fn human_size(num_bytes: u64) -> String {
    let mut size = num_bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TB")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_dir_is_sibling_with_upper_extension() {
        let dir = backup_dir_for(Path::new("/data/Photos"), "png").unwrap();
        assert_eq!(dir, Path::new("/data/Photos_PNG"));

        let dir = backup_dir_for(Path::new("/data/Photos/"), ".jpeg").unwrap();
        assert_eq!(dir, Path::new("/data/Photos_JPEG"));
    }

    #[test]
    fn backup_dir_needs_a_folder_name() {
        assert!(backup_dir_for(Path::new("/"), "png").is_none());
    }

    #[test]
    fn human_sizes() {
        assert_eq!(human_size(512), "512.0 B");
        assert_eq!(human_size(12 * 1024 + 300), "12.3 KB");
        assert_eq!(human_size(4 * 1024 * 1024), "4.0 MB");
        assert_eq!(human_size(3 * 1024u64.pow(4)), "3.0 TB");
    }

    #[test]
    fn lists_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.PNG", "c.jpg", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.png")).unwrap();

        let files = list_files_with_extension(dir.path(), "png").unwrap();
        let names: Vec<_> = files.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a.PNG", "b.png"]);
    }

    #[test]
    fn same_path_sees_through_relative_segments() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.png");
        fs::write(&source, b"png").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        assert!(same_path(&source, &sub.join("..").join("a.png")));
        assert!(same_path(&dir.path().join("missing.png"), &sub.join("../missing.png")));
        assert!(!same_path(&source, &dir.path().join("a.jpg")));
    }

    #[test]
    fn move_file_relocates_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.png");
        let to = dir.path().join("b.png");
        fs::write(&from, b"original").unwrap();

        move_file(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"original");
    }
}
