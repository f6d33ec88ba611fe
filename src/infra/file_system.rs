use crate::domain::models::{DirEntry, EntryKind, FileStat};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem access used by the bundle builder. Every call may fail; callers
/// treat a failure as "skip this node, log, continue".
pub trait FileSystemProvider {
    fn stat(&self, path: &Path) -> anyhow::Result<FileStat>;

    /// Immediate children of `path`, sorted by name.
    fn read_directory(&self, path: &Path) -> anyhow::Result<Vec<DirEntry>>;

    fn read_file(&self, path: &Path) -> anyhow::Result<Vec<u8>>;

    /// Identity used for visited-set membership.
    fn canonicalize(&self, path: &Path) -> anyhow::Result<PathBuf>;
}

pub struct LocalFileSystem;

fn kind_of(metadata: &fs::Metadata) -> EntryKind {
    if metadata.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    }
}

impl FileSystemProvider for LocalFileSystem {
    fn stat(&self, path: &Path) -> anyhow::Result<FileStat> {
        let metadata = fs::metadata(path)?;
        Ok(FileStat {
            kind: kind_of(&metadata),
            size_bytes: metadata.len(),
        })
    }

    fn read_directory(&self, path: &Path) -> anyhow::Result<Vec<DirEntry>> {
        debug!("Listing directory: {}", path.display());
        let mut entries = Vec::new();

        for entry in walkdir::WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let kind = if entry.file_type().is_symlink() {
                // Broken links still show up, as plain entries.
                fs::metadata(entry.path())
                    .map(|m| kind_of(&m))
                    .unwrap_or(EntryKind::File)
            } else if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                kind,
            });
        }

        debug!("Found {} entries in {}", entries.len(), path.display());
        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        debug!("Reading file contents: {}", path.display());
        let bytes = fs::read(path)?;
        debug!("Read {} bytes from file", bytes.len());
        Ok(bytes)
    }

    fn canonicalize(&self, path: &Path) -> anyhow::Result<PathBuf> {
        Ok(fs::canonicalize(path)?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_stat_and_read_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "Test content").unwrap();
        }

        let fs = LocalFileSystem;
        let stat = fs.stat(&file_path).unwrap();
        assert_eq!(stat.kind, EntryKind::File);
        assert_eq!(stat.size_bytes, 13);
        assert_eq!(fs.read_file(&file_path).unwrap(), b"Test content\n");

        let dir_stat = fs.stat(temp_dir.path()).unwrap();
        assert_eq!(dir_stat.kind, EntryKind::Directory);
    }

    #[test]
    fn test_stat_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalFileSystem;
        assert!(fs.stat(&temp_dir.path().join("nonexistent.txt")).is_err());
        assert!(fs.read_file(&temp_dir.path().join("nonexistent.txt")).is_err());
    }

    #[test]
    fn test_read_directory_is_one_level_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("sub/deep")).unwrap();
        fs::write(temp_dir.path().join("b.txt"), "b").unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        fs::write(temp_dir.path().join("sub/deep/c.txt"), "c").unwrap();

        let entries = LocalFileSystem.read_directory(temp_dir.path()).unwrap();

        assert_eq!(
            entries,
            vec![
                DirEntry {
                    name: "a.txt".to_string(),
                    kind: EntryKind::File
                },
                DirEntry {
                    name: "b.txt".to_string(),
                    kind: EntryKind::File
                },
                DirEntry {
                    name: "sub".to_string(),
                    kind: EntryKind::Directory
                },
            ]
        );
    }

    #[test]
    fn test_read_directory_missing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(
            LocalFileSystem
                .read_directory(&temp_dir.path().join("missing"))
                .is_err()
        );
    }

    #[test]
    fn test_mock_links_resolve() {
        let mut mock = mock::MockFileSystem::new();
        mock.add_file("/w/a/b.txt", b"hi");
        mock.add_link("/w/a/loop", "/w/a");

        assert_eq!(
            mock.canonicalize(Path::new("/w/a/loop/b.txt")).unwrap(),
            PathBuf::from("/w/a/b.txt")
        );
        assert_eq!(
            mock.stat(Path::new("/w/a/loop")).unwrap().kind,
            EntryKind::Directory
        );
    }
}
