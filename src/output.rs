use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::ExtractError;
use crate::models::{BoundingBox, NameMatch, PhotoEntry};

/// Resolve a fresh output directory for one run.
///
/// Creates `base` itself when it does not exist, otherwise probes `base(1)`,
/// `base(2)`, … and takes the first free slot. Every probe is an atomic
/// create-if-absent directory creation, so two runs racing on the same base
/// cannot claim the same folder; the returned path did not exist at the
/// moment it was created.
pub fn allocate_run_folder(base: &Path) -> Result<PathBuf, ExtractError> {
    if let Some(parent) = base.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ExtractError::Allocation {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    match try_claim(base) {
        Ok(true) => return Ok(base.to_path_buf()),
        Ok(false) => {}
        Err(source) => {
            return Err(ExtractError::Allocation {
                path: base.to_path_buf(),
                source,
            });
        }
    }

    let mut counter = 1u32;
    loop {
        let candidate = numbered_sibling(base, counter);
        match try_claim(&candidate) {
            Ok(true) => return Ok(candidate),
            Ok(false) => counter += 1,
            Err(source) => {
                return Err(ExtractError::Allocation {
                    path: candidate,
                    source,
                });
            }
        }
    }
}

/// Atomically create `path`; `Ok(false)` when it already exists.
fn try_claim(path: &Path) -> io::Result<bool> {
    match fs::create_dir(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(err) => Err(err),
    }
}

/// `base(n)`, keeping the numeric suffix on the final path component.
fn numbered_sibling(base: &Path, n: u32) -> PathBuf {
    let name = base
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.with_file_name(format!("{}({})", name, n))
}

/// Write one crop, and its name metadata when present, into `folder`.
///
/// The crop lands at `<base_name>.png`; a matched name additionally produces
/// a pretty-printed `<base_name>.json` sidecar. Base-name collisions within a
/// run overwrite the earlier artifacts.
pub fn write_entry(
    folder: &Path,
    base_name: &str,
    crop: &DynamicImage,
    rect: BoundingBox,
    name_match: Option<&NameMatch>,
) -> Result<PhotoEntry, ExtractError> {
    let image_path = folder.join(format!("{base_name}.png"));
    crop.save(&image_path)
        .map_err(|e| ExtractError::WriteArtifact {
            path: image_path.clone(),
            message: e.to_string(),
        })?;

    let metadata_path = match name_match {
        Some(matched) => {
            let path = folder.join(format!("{base_name}.json"));
            let json = serde_json::to_string_pretty(matched).map_err(|e| {
                ExtractError::WriteArtifact {
                    path: path.clone(),
                    message: e.to_string(),
                }
            })?;
            fs::write(&path, json).map_err(|e| ExtractError::WriteArtifact {
                path: path.clone(),
                message: e.to_string(),
            })?;
            Some(path)
        }
        None => None,
    };

    Ok(PhotoEntry {
        name: base_name.to_string(),
        image_path,
        metadata_path,
        bbox: rect,
    })
}
