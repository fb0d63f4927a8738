use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Result;

/// Walk `root` depth-first with each directory's files listed before its
/// subfolders, both in lexicographic order. Every pass over a tree uses
/// this so reruns see files in the same order.
pub fn sorted_walk(root: &Path) -> walkdir::IntoIter {
    WalkDir::new(root)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
}

/// Collect every file under `root` as a path relative to `root`, in
/// deterministic walk order.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in sorted_walk(root) {
        let entry = entry?;
        if entry.file_type().is_file() {
            if let Ok(rel) = entry.path().strip_prefix(root) {
                files.push(rel.to_path_buf());
            }
        }
    }
    Ok(files)
}

/// Create every directory in `dirs` that does not exist yet. Returns how
/// many were missing. Existence checks and creation run in parallel;
/// `create_dir_all` makes parent ordering irrelevant.
pub fn create_missing_dirs(dirs: &[PathBuf]) -> Result<usize> {
    let missing: Vec<&PathBuf> = dirs.par_iter().filter(|dir| !dir.exists()).collect();

    missing.par_iter().try_for_each(|dir| -> io::Result<()> {
        fs::create_dir_all(dir)?;
        Ok(())
    })?;

    Ok(missing.len())
}

/// Replicate the directory structure of `source` under `destination`,
/// including the destination root itself. Returns how many directories
/// were created.
pub fn replicate_tree_dirs(source: &Path, destination: &Path) -> Result<usize> {
    let mut dirs = Vec::new();
    for entry in sorted_walk(source) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            if let Ok(rel) = entry.path().strip_prefix(source) {
                dirs.push(destination.join(rel));
            }
        }
    }
    create_missing_dirs(&dirs)
}

/// Batch-check which of `paths` already exist, index-aligned with the
/// input.
pub fn batch_check_existing(paths: &[PathBuf]) -> Vec<bool> {
    paths.par_iter().map(|path| path.exists()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn collect_files_lists_files_before_subfolders() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("Bones/Colorable/ColorableBone1.png"));
        touch(&dir.path().join("Bones/NonColorableBone1.png"));
        touch(&dir.path().join("loose.png"));

        let files = collect_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("loose.png"),
                PathBuf::from("Bones/NonColorableBone1.png"),
                PathBuf::from("Bones/Colorable/ColorableBone1.png"),
            ]
        );
    }

    #[test]
    fn replicate_creates_all_directories() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dst");
        fs::create_dir_all(source.join("a/b")).unwrap();
        fs::create_dir_all(source.join("c")).unwrap();

        let created = replicate_tree_dirs(&source, &dest).unwrap();
        assert!(created >= 3);
        assert!(dest.join("a/b").is_dir());
        assert!(dest.join("c").is_dir());

        // Second run finds nothing missing.
        assert_eq!(replicate_tree_dirs(&source, &dest).unwrap(), 0);
    }

    #[test]
    fn batch_check_reports_per_path() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("here.png");
        touch(&present);
        let absent = dir.path().join("missing.png");

        assert_eq!(batch_check_existing(&[present, absent]), vec![true, false]);
    }
}
