use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PackError, Result};
use crate::pack::{TagManifest, COLORABLE_TAG, OBJECTS_SUBDIR};
use crate::utils::{files, paths};

/// Build the tag manifest for an asset pack from its object folder layout.
///
/// Immediate subfolders of `<pack>/textures/objects` become tags. Files in
/// any `Colorable` sub-bucket also aggregate into a shared `Colorable` tag,
/// and files sitting directly in the object folder go under `default_tag`
/// when one is given. Writes `data/default.dungeondraft_tags` under the
/// pack root and returns its path.
pub fn generate(
    pack_root: &Path,
    default_tag: Option<&str>,
    include: &[String],
    exclude: &[String],
) -> Result<PathBuf> {
    // Everything is validated before anything is written.
    if let Some(tag) = default_tag {
        paths::validate_name("default tag", tag)?;
    }
    for name in include {
        paths::validate_name("include folder", name)?;
    }
    for name in exclude {
        paths::validate_name("exclude folder", name)?;
        if contains_ci(include, name) {
            return Err(PackError::IncludeExcludeConflict(name.clone()));
        }
    }

    if !pack_root.is_dir() {
        return Err(PackError::PathNotFound(pack_root.to_path_buf()));
    }
    let pack_root = pack_root.canonicalize()?;
    let pack_name = match pack_root.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => {
            return Err(PackError::InvalidName {
                what: "pack folder name",
                value: pack_root.display().to_string(),
            })
        }
    };

    let object_root = pack_root.join(OBJECTS_SUBDIR);
    if !object_root.is_dir() {
        return Err(PackError::PathNotFound(object_root));
    }

    let subfolders = immediate_subfolders(&object_root)?;
    for name in include {
        if !contains_ci(&subfolders, name) {
            return Err(PackError::ListedFolderMissing {
                list: "include",
                name: name.clone(),
            });
        }
    }
    for name in exclude {
        if !contains_ci(&subfolders, name) {
            return Err(PackError::ListedFolderMissing {
                list: "exclude",
                name: name.clone(),
            });
        }
    }
    if let Some(tag) = default_tag {
        if contains_ci(&subfolders, tag) {
            return Err(PackError::TagConflict(tag.to_string()));
        }
    }

    println!("Generating tags for pack: {}", pack_name);
    println!("Object folder: {}", object_root.display());

    let kept: Vec<&str> = subfolders
        .iter()
        .map(String::as_str)
        .filter(|name| include.is_empty() || contains_ci(include, name))
        .filter(|name| !contains_ci(exclude, name))
        .collect();

    let mut manifest = TagManifest::new();
    let mut colorable_files = Vec::new();
    let mut set_tags = Vec::new();
    let mut entries = 0usize;

    for name in kept {
        let folder_files = files::collect_files(&object_root.join(name))?;

        // A top-level Colorable folder feeds the aggregate tag only; it is
        // never a tag or a set member itself.
        if name.eq_ignore_ascii_case(COLORABLE_TAG) {
            for file in &folder_files {
                colorable_files.push(paths::to_forward_slashes(&Path::new(name).join(file)));
            }
            continue;
        }

        let mut listed = Vec::with_capacity(folder_files.len());
        for file in &folder_files {
            let rel = Path::new(name).join(file);
            let text = paths::to_forward_slashes(&rel);
            if paths::has_dir_segment(&rel, COLORABLE_TAG) {
                colorable_files.push(text.clone());
            }
            listed.push(text);
        }
        entries += listed.len();
        manifest.append_tag(name, listed);
        set_tags.push(name.to_string());
    }

    if !colorable_files.is_empty() {
        entries += colorable_files.len();
        manifest.append_tag(COLORABLE_TAG, colorable_files);
    }

    if let Some(tag) = default_tag {
        let root_files = root_level_files(&object_root)?;
        if !root_files.is_empty() {
            entries += root_files.len();
            manifest.append_tag(tag, root_files);
            set_tags.insert(0, tag.to_string());
        }
    }

    manifest.add_set(&pack_name, set_tags);

    let written = manifest.write_to_pack(&pack_root)?;
    println!("Tags written: {} ({} path entries)", manifest.tag_count(), entries);
    println!("Tag manifest: {}", written.display());
    Ok(written)
}

/// Immediate subfolder names of the object folder, in lexicographic order.
fn immediate_subfolders(object_root: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(object_root)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if entry.file_type().ok()?.is_dir() {
                Some(entry.file_name().to_string_lossy().into_owned())
            } else {
                None
            }
        })
        .collect();
    names.sort();
    Ok(names)
}

/// Files sitting directly in the object folder, in lexicographic order.
fn root_level_files(object_root: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(object_root)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if entry.file_type().ok()?.is_file() {
                Some(entry.file_name().to_string_lossy().into_owned())
            } else {
                None
            }
        })
        .collect();
    names.sort();
    Ok(names)
}

fn contains_ci(names: &[String], wanted: &str) -> bool {
    names.iter().any(|name| name.eq_ignore_ascii_case(wanted))
}
