//! Path safety — maps catalog filenames to files inside the upload folder.

use std::path::{Path, PathBuf};

use tracing::warn;

/// Resolves a photo filename to an absolute path under `base_dir`.
/// Returns `None` for missing files and anything that would escape `base_dir`.
pub trait PhotoResolver: Send + Sync {
    fn resolve(&self, base_dir: &Path, filename: &str) -> Option<PathBuf>;
}

/// Filesystem-backed resolver.
///
/// The filename is reduced to its last component and stripped of control
/// characters, then canonicalized; symlinks that point outside `base_dir` are rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsPhotoResolver;

impl PhotoResolver for FsPhotoResolver {
    fn resolve(&self, base_dir: &Path, filename: &str) -> Option<PathBuf> {
        let cleaned = sanitize_filename(filename)?;

        let base = match base_dir.canonicalize() {
            Ok(base) => base,
            Err(e) => {
                warn!("Upload folder {} unavailable: {e}", base_dir.display());
                return None;
            }
        };

        let full = match base.join(&cleaned).canonicalize() {
            Ok(full) => full,
            Err(_) => {
                warn!("Photo file not found: {}", base.join(&cleaned).display());
                return None;
            }
        };

        if !full.starts_with(&base) {
            warn!("Path traversal attempt detected: {filename}");
            return None;
        }

        full.is_file().then_some(full)
    }
}

/// Last path component with C0/C1 control characters removed. This is the
/// name `FsPhotoResolver` looks up under the upload folder.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let last = Path::new(filename).file_name()?.to_str()?;
    let cleaned: String = last
        .chars()
        .filter(|c| !matches!(*c as u32, 0x00..=0x1f | 0x7f..=0x9f))
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}
