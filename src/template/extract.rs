//! Materialize a cached zip archive into a target directory.
//!
//! The whole archive is planned before the first byte is written: every
//! entry path is validated (no absolute paths, no `..`, no symlink entries,
//! bounded entry count and size) and a shared top-level folder is stripped
//! when the template wraps its content in one. Entries are then written in
//! archive order, each destination re-checked against the canonical target
//! so a symlink already in an overwritten target cannot redirect a write.
//! There is no rollback; deleting the target and retrying is safe.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Seek};
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

use crate::error::{CreateError, Result};

/// Archive formats cannot portably store a leading-dot name, so templates
/// ship the ignore file under this name.
pub const GITIGNORE_TEMPLATE: &str = "gitignore.template";

/// Mode applied to files whose archive entry records no permissions
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Maximum number of entries in a template archive
const MAX_ENTRY_COUNT: usize = 10_000;

/// Maximum total uncompressed size (500 MB)
const MAX_EXTRACTED_SIZE: u64 = 500_000_000;

/// File-type bits of a unix mode, and the value marking a symlink
const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// An archive entry as recorded in the zip central directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub index: usize,
    pub name: String,
    pub is_dir: bool,
    pub mode: Option<u32>,
    pub size: u64,
}

/// A validated entry, relative to the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub index: usize,
    pub path: PathBuf,
    pub kind: EntryKind,
    pub mode: Option<u32>,
}

/// Everything the materializer will write, computed up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionManifest {
    pub entries: Vec<ManifestEntry>,
    pub stripped_root: Option<OsString>,
}

/// What an extraction produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub directories: usize,
    pub files: usize,
    pub stripped_root: Option<String>,
    pub gitignore_renamed: bool,
}

impl ExtractionManifest {
    /// Read entry metadata from an open archive without decompressing.
    pub fn read<R: Read + Seek>(archive: &mut ZipArchive<R>) -> std::result::Result<Self, String> {
        let mut raw = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive
                .by_index_raw(index)
                .map_err(|e| format!("unreadable entry #{index}: {e}"))?;
            raw.push(RawEntry {
                index,
                name: entry.name().to_string(),
                is_dir: entry.is_dir(),
                mode: entry.unix_mode(),
                size: entry.size(),
            });
        }
        Self::plan(raw)
    }

    /// Validate every path, then strip a shared top-level folder if present.
    pub fn plan(raw: Vec<RawEntry>) -> std::result::Result<Self, String> {
        if raw.len() > MAX_ENTRY_COUNT {
            return Err(format!(
                "archive exceeds maximum entry count ({MAX_ENTRY_COUNT})"
            ));
        }

        let mut total_size: u64 = 0;
        let mut validated = Vec::with_capacity(raw.len());
        for entry in raw {
            if entry.mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
                return Err(format!("entry '{}' is a symlink", entry.name));
            }
            total_size = total_size.saturating_add(entry.size);
            if total_size > MAX_EXTRACTED_SIZE {
                return Err(format!(
                    "archive exceeds maximum extracted size ({MAX_EXTRACTED_SIZE} bytes)"
                ));
            }

            let path = relative_path(&entry.name)
                .ok_or_else(|| format!("entry '{}' escapes the target directory", entry.name))?;
            if path.as_os_str().is_empty() && !entry.is_dir {
                return Err(format!("entry '{}' has no file name", entry.name));
            }
            let kind = if entry.is_dir {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            validated.push(ManifestEntry {
                index: entry.index,
                path,
                kind,
                mode: entry.mode,
            });
        }

        let stripped_root = shared_root(&validated);
        let entries = match &stripped_root {
            Some(root) => validated
                .into_iter()
                .filter_map(|mut entry| {
                    let rest = entry.path.strip_prefix(root).ok()?.to_path_buf();
                    if rest.as_os_str().is_empty() {
                        return None;
                    }
                    entry.path = rest;
                    Some(entry)
                })
                .collect(),
            None => validated
                .into_iter()
                .filter(|entry| !entry.path.as_os_str().is_empty())
                .collect(),
        };

        Ok(Self {
            entries,
            stripped_root,
        })
    }

    /// Relative paths of the files (not directories) this manifest writes.
    pub fn file_paths(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .map(|e| e.path.as_path())
    }
}

/// Extract `archive_path` into `target`, which must already exist.
pub fn extract(archive_path: &Path, target: &Path) -> Result<ExtractionReport> {
    let failed = |reason: String| CreateError::ExtractionFailed {
        archive: archive_path.to_path_buf(),
        target: target.to_path_buf(),
        reason,
    };

    let file = File::open(archive_path).map_err(|e| failed(format!("cannot open archive: {e}")))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| failed(format!("not a valid zip archive: {e}")))?;
    let manifest = ExtractionManifest::read(&mut archive).map_err(failed)?;
    let root = target
        .canonicalize()
        .map_err(|e| failed(format!("cannot resolve target: {e}")))?;

    if let Some(stripped) = &manifest.stripped_root {
        tracing::debug!(root = %stripped.to_string_lossy(), "stripping shared top-level folder");
    }

    let mut report = ExtractionReport {
        stripped_root: manifest
            .stripped_root
            .as_ref()
            .map(|r| r.to_string_lossy().into_owned()),
        ..ExtractionReport::default()
    };

    for entry in &manifest.entries {
        let dest = root.join(&entry.path);
        let inside = resolves_within(&root, &dest)
            .map_err(|e| failed(format!("{}: {e}", entry.path.display())))?;
        if !inside {
            return Err(failed(format!(
                "entry '{}' resolves outside the target directory",
                entry.path.display()
            )));
        }

        match entry.kind {
            EntryKind::Directory => {
                fs::create_dir_all(&dest)
                    .map_err(|e| failed(format!("{}: {e}", entry.path.display())))?;
                report.directories += 1;
            }
            EntryKind::File => {
                write_file(&mut archive, entry, &dest)
                    .map_err(|e| failed(format!("{}: {e}", entry.path.display())))?;
                report.files += 1;
                tracing::trace!(path = %dest.display(), "template entry written");
            }
        }
    }

    report.gitignore_renamed = rename_gitignore_template(target)
        .map_err(|e| failed(format!("{GITIGNORE_TEMPLATE}: {e}")))?;

    tracing::debug!(
        path = %target.display(),
        directories = report.directories,
        files = report.files,
        "template extracted"
    );
    Ok(report)
}

/// Whether `dest` stays under `root` (canonical) once the symlinks that
/// already exist along it are followed. Missing trailing components are
/// plain names, so the deepest existing ancestor decides.
fn resolves_within(root: &Path, dest: &Path) -> io::Result<bool> {
    for ancestor in dest.ancestors() {
        match fs::symlink_metadata(ancestor) {
            Ok(_) => return Ok(ancestor.canonicalize()?.starts_with(root)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(false)
}

/// Rename `gitignore.template` at the target root to `.gitignore`.
pub fn rename_gitignore_template(target: &Path) -> io::Result<bool> {
    let template = target.join(GITIGNORE_TEMPLATE);
    match fs::symlink_metadata(&template) {
        Ok(_) => {
            fs::rename(&template, target.join(".gitignore"))?;
            tracing::debug!("gitignore template renamed");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn write_file<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    entry: &ManifestEntry,
    dest: &Path,
) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut zipped = archive
        .by_index(entry.index)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mode = entry
        .mode
        .map(|m| m & 0o777)
        .filter(|m| *m != 0)
        .unwrap_or(DEFAULT_FILE_MODE);

    let mut out = open_for_write(dest, mode)?;
    io::copy(&mut zipped, &mut out)?;
    out.sync_all()
}

#[cfg(unix)]
fn open_for_write(path: &Path, mode: u32) -> io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)?;
    // `mode` above only applies on creation and goes through the umask.
    file.set_permissions(fs::Permissions::from_mode(mode))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_for_write(path: &Path, _mode: u32) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Entry name as a target-relative path, or `None` if it could escape.
fn relative_path(name: &str) -> Option<PathBuf> {
    // Backslashes are plain characters on unix but separators elsewhere.
    if name.split(['/', '\\']).any(|part| part == "..") {
        return None;
    }

    let mut path = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(path)
}

/// The single top-level folder every entry lives under, if there is one.
///
/// A regular file at the archive root means content is not wrapped.
fn shared_root(entries: &[ManifestEntry]) -> Option<OsString> {
    let mut root: Option<OsString> = None;
    for entry in entries {
        let mut components = entry.path.components();
        let Some(first) = components.next().map(|c| c.as_os_str()) else {
            continue;
        };
        let nested = components.next().is_some();
        if !nested && entry.kind == EntryKind::File {
            return None;
        }
        match &root {
            None => root = Some(first.to_os_string()),
            Some(existing) if existing != first => return None,
            Some(_) => {}
        }
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(index: usize, name: &str, is_dir: bool) -> RawEntry {
        RawEntry {
            index,
            name: name.to_string(),
            is_dir,
            mode: None,
            size: 0,
        }
    }

    fn paths(manifest: &ExtractionManifest) -> Vec<String> {
        manifest
            .entries
            .iter()
            .map(|e| e.path.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_plan_strips_shared_root() {
        let manifest = ExtractionManifest::plan(vec![
            raw(0, "redwood-app/", true),
            raw(1, "redwood-app/package.json", false),
            raw(2, "redwood-app/web/", true),
            raw(3, "redwood-app/web/index.html", false),
        ])
        .unwrap();

        assert_eq!(manifest.stripped_root, Some(OsString::from("redwood-app")));
        assert_eq!(paths(&manifest), vec!["package.json", "web", "web/index.html"]);
    }

    #[test]
    fn test_plan_strips_root_without_directory_entries() {
        let manifest = ExtractionManifest::plan(vec![
            raw(0, "app/package.json", false),
            raw(1, "app/api/db/schema.prisma", false),
        ])
        .unwrap();

        assert_eq!(manifest.stripped_root, Some(OsString::from("app")));
        assert_eq!(paths(&manifest), vec!["package.json", "api/db/schema.prisma"]);
    }

    #[test]
    fn test_plan_keeps_flat_layout() {
        let manifest = ExtractionManifest::plan(vec![
            raw(0, "package.json", false),
            raw(1, "web/", true),
            raw(2, "web/index.html", false),
        ])
        .unwrap();

        assert_eq!(manifest.stripped_root, None);
        assert_eq!(paths(&manifest), vec!["package.json", "web", "web/index.html"]);
    }

    #[test]
    fn test_plan_keeps_single_directory_with_root_file() {
        let manifest = ExtractionManifest::plan(vec![
            raw(0, "web/index.html", false),
            raw(1, "README.md", false),
        ])
        .unwrap();
        assert_eq!(manifest.stripped_root, None);
    }

    #[test]
    fn test_plan_rejects_traversal() {
        for name in ["../evil.sh", "app/../../evil.sh", "/etc/passwd", "app\\..\\evil"] {
            let err = ExtractionManifest::plan(vec![
                raw(0, "app/package.json", false),
                raw(1, name, false),
            ])
            .unwrap_err();
            assert!(err.contains("escapes"), "{name}: {err}");
        }
    }

    #[test]
    fn test_plan_rejects_symlink_entries() {
        let mut link = raw(1, "app/web/public", false);
        link.mode = Some(0o120_777);
        let err = ExtractionManifest::plan(vec![raw(0, "app/package.json", false), link])
            .unwrap_err();
        assert!(err.contains("symlink"), "{err}");
    }

    #[test]
    fn test_plan_rejects_oversized_archive() {
        let mut huge = raw(0, "app/blob.bin", false);
        huge.size = MAX_EXTRACTED_SIZE + 1;
        let err = ExtractionManifest::plan(vec![huge]).unwrap_err();
        assert!(err.contains("maximum extracted size"), "{err}");

        let many = (0..=MAX_ENTRY_COUNT)
            .map(|i| raw(i, &format!("app/f{i}.txt"), false))
            .collect();
        let err = ExtractionManifest::plan(many).unwrap_err();
        assert!(err.contains("maximum entry count"), "{err}");
    }

    #[test]
    fn test_destination_must_resolve_inside_root() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        assert!(resolves_within(&root, &root.join("web/src/App.tsx")).unwrap());
        assert!(!resolves_within(&root, temp.path().parent().unwrap()).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_does_not_count_as_inside() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().join("app");
        let outside = temp.path().join("outside");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&outside).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("web")).unwrap();

        let root = root.canonicalize().unwrap();
        assert!(!resolves_within(&root, &root.join("web/index.html")).unwrap());
        assert!(!resolves_within(&root, &root.join("web/src/deep/App.tsx")).unwrap());
        assert!(resolves_within(&root, &root.join("package.json")).unwrap());
    }

    #[test]
    fn test_plan_ignores_current_dir_segments() {
        let manifest =
            ExtractionManifest::plan(vec![raw(0, "./package.json", false), raw(1, "./", true)])
                .unwrap();
        assert_eq!(paths(&manifest), vec!["package.json"]);
    }

    #[test]
    fn test_empty_archive_plans_nothing() {
        let manifest = ExtractionManifest::plan(vec![]).unwrap();
        assert!(manifest.entries.is_empty());
        assert_eq!(manifest.stripped_root, None);
    }
}
