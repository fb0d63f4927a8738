use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{PackError, Result};
use crate::utils::{files, paths};

/// Extension the object images are converted to.
const TARGET_EXTENSION: &str = "webp";

/// Image extensions the converter recognizes as input, without dots.
const SOURCE_EXTENSIONS: [&str; 10] = [
    "bmp", "dds", "exr", "hdr", "jpeg", "jpg", "png", "svg", "svgz", "tga",
];

/// Dotted source extensions ordered longest first, so `.svgz` is rewritten
/// before `.svg` can match inside it.
const REWRITE_ORDER: [&str; 10] = [
    ".jpeg", ".svgz", ".bmp", ".dds", ".exr", ".hdr", ".jpg", ".png", ".svg", ".tga",
];

/// Extension of the tag manifest files whose contents get rewritten.
const TAGS_EXTENSION: &str = "dungeondraft_tags";

/// Install locations checked when the converter is not on PATH.
const CWEBP_FALLBACK_DIRS: [&str; 3] = [
    "/usr/local/bin",
    "/opt/homebrew/bin",
    "C:\\Program Files\\libwebp\\bin",
];

/// What one source file gets during the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileAction {
    /// Object image in a source format: encode to WebP.
    Convert,
    /// Tag manifest: rewrite extension references into the mirrored copy.
    RewriteTags,
    /// Everything else: copy unchanged.
    Copy,
}

/// Counters for one conversion pass.
#[derive(Debug, Default)]
pub struct ConvertStats {
    pub converted: usize,
    pub copied: usize,
    pub manifests_rewritten: usize,
    pub skipped_existing: usize,
}

/// Mirror `source` under `destination`, encoding object images to WebP via
/// the external `cwebp` encoder and rewriting tag manifests to match the
/// renamed extensions. Files whose destination already exists are skipped,
/// so reruns over an unchanged tree do no work.
pub fn convert_tree(source: &Path, destination: &Path) -> Result<ConvertStats> {
    if !source.is_dir() {
        return Err(PackError::PathNotFound(source.to_path_buf()));
    }
    let cwebp = locate_cwebp()?;
    println!("Converting pack: {}", source.display());
    println!("Using converter: {}", cwebp.display());

    let stats = convert_with(&cwebp, source, destination)?;
    print_convert_stats(&stats);
    Ok(stats)
}

/// One full pass over the tree with an already-located converter.
fn convert_with(cwebp: &Path, source: &Path, destination: &Path) -> Result<ConvertStats> {
    // Every destination parent exists before any file is written.
    let created = files::replicate_tree_dirs(source, destination)?;
    if created > 0 {
        println!("Created {} directories", created);
    }

    let rel_files = files::collect_files(source)?;
    let targets: Vec<PathBuf> = rel_files
        .iter()
        .map(|rel| destination.join(destination_rel(rel)))
        .collect();
    let existing = files::batch_check_existing(&targets);

    let pb = ProgressBar::new(rel_files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut stats = ConvertStats::default();
    for ((rel, target), exists) in rel_files.iter().zip(&targets).zip(&existing) {
        if *exists {
            stats.skipped_existing += 1;
            pb.inc(1);
            continue;
        }
        let input = source.join(rel);
        match classify(rel) {
            FileAction::Convert => {
                run_cwebp(cwebp, &input, target)?;
                stats.converted += 1;
            }
            FileAction::RewriteTags => {
                let text = fs::read_to_string(&input)?;
                fs::write(target, rewrite_extension_refs(&text))?;
                stats.manifests_rewritten += 1;
            }
            FileAction::Copy => {
                fs::copy(&input, target)?;
                stats.copied += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Conversion complete!");

    Ok(stats)
}

/// Decide what happens to a source file from its relative path alone.
fn classify(rel: &Path) -> FileAction {
    let ext = match rel.extension() {
        Some(ext) => ext.to_string_lossy().to_ascii_lowercase(),
        None => return FileAction::Copy,
    };
    if ext == TAGS_EXTENSION {
        return FileAction::RewriteTags;
    }
    if SOURCE_EXTENSIONS.contains(&ext.as_str()) && in_objects_tree(rel) {
        return FileAction::Convert;
    }
    FileAction::Copy
}

/// Destination path for a source file, relative to the destination root.
fn destination_rel(rel: &Path) -> PathBuf {
    match classify(rel) {
        FileAction::Convert => rel.with_extension(TARGET_EXTENSION),
        _ => rel.to_path_buf(),
    }
}

fn in_objects_tree(rel: &Path) -> bool {
    paths::starts_with_components(rel, &["textures", "objects"])
}

/// Replace every dotted source-extension reference with `.webp`, keeping
/// tag paths consistent with the renamed image files.
fn rewrite_extension_refs(text: &str) -> String {
    let mut out = text.to_string();
    for ext in REWRITE_ORDER {
        out = replace_ignore_ascii_case(&out, ext, ".webp");
    }
    out
}

/// Case-insensitive literal replacement. Lowercasing ASCII keeps byte
/// offsets intact, so match positions in the lowered copy map directly
/// onto the original text.
fn replace_ignore_ascii_case(text: &str, from: &str, to: &str) -> String {
    let lowered = text.to_ascii_lowercase();
    let needle = from.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (pos, _) in lowered.match_indices(&needle) {
        out.push_str(&text[last..pos]);
        out.push_str(to);
        last = pos + needle.len();
    }
    out.push_str(&text[last..]);
    out
}

/// Encode one image. cwebp takes the input path and `-o <output>`.
fn run_cwebp(cwebp: &Path, input: &Path, output: &Path) -> Result<()> {
    let status = Command::new(cwebp).arg(input).arg("-o").arg(output).status()?;
    if !status.success() {
        return Err(PackError::ConverterFailed {
            input: input.to_path_buf(),
            status,
        });
    }
    Ok(())
}

/// Locate the external WebP encoder: every PATH entry first, then the
/// conventional install directories.
pub fn locate_cwebp() -> Result<PathBuf> {
    let name = if cfg!(windows) { "cwebp.exe" } else { "cwebp" };
    if let Some(path_var) = env::var_os("PATH") {
        for dir in env::split_paths(&path_var) {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    for dir in CWEBP_FALLBACK_DIRS {
        let candidate = Path::new(dir).join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(PackError::MissingDependency("cwebp"))
}

/// Print conversion statistics
fn print_convert_stats(stats: &ConvertStats) {
    println!("\n🎯 Conversion Statistics:");
    println!("  🔄 Converted to WebP: {}", stats.converted);
    println!("  📄 Copied unchanged: {}", stats.copied);
    println!("  🏷️  Tag manifests rewritten: {}", stats.manifests_rewritten);
    println!("  ⏭️  Skipped (already existed): {}", stats.skipped_existing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn object_images_convert_and_everything_else_copies() {
        assert_eq!(classify(Path::new("textures/objects/Trees/Oak.png")), FileAction::Convert);
        assert_eq!(classify(Path::new("Textures/OBJECTS/Rock.JPG")), FileAction::Convert);
        assert_eq!(classify(Path::new("textures/objects/done.webp")), FileAction::Copy);
        assert_eq!(classify(Path::new("textures/terrain/grass.png")), FileAction::Copy);
        assert_eq!(classify(Path::new("textures/objects/notes.txt")), FileAction::Copy);
        assert_eq!(classify(Path::new("preview.png")), FileAction::Copy);
        assert_eq!(classify(Path::new("README")), FileAction::Copy);
        assert_eq!(
            classify(Path::new("data/default.dungeondraft_tags")),
            FileAction::RewriteTags
        );
    }

    #[test]
    fn converted_files_get_the_webp_extension() {
        assert_eq!(
            destination_rel(Path::new("textures/objects/Trees/Oak.png")),
            PathBuf::from("textures/objects/Trees/Oak.webp")
        );
        assert_eq!(
            destination_rel(Path::new("textures/terrain/grass.png")),
            PathBuf::from("textures/terrain/grass.png")
        );
    }

    #[test]
    fn extension_references_are_rewritten() {
        let text = r#"{"tags": {"Bones": ["Bones/bone.png", "Bones/old.JPG", "Bones/fancy.jpeg"]}}"#;
        let out = rewrite_extension_refs(text);
        assert_eq!(
            out,
            r#"{"tags": {"Bones": ["Bones/bone.webp", "Bones/old.webp", "Bones/fancy.webp"]}}"#
        );
    }

    #[test]
    fn svgz_is_not_clobbered_by_svg() {
        assert_eq!(rewrite_extension_refs("a.svgz b.svg"), "a.webp b.webp");
    }

    #[test]
    fn replacement_ignores_ascii_case_only() {
        assert_eq!(replace_ignore_ascii_case("x.PNG y.png", ".png", ".webp"), "x.webp y.webp");
        assert_eq!(replace_ignore_ascii_case("touché.png", ".png", ".webp"), "touché.webp");
    }

    #[test]
    fn mirror_pass_rewrites_manifests_and_skips_on_rerun() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("pack");
        touch(
            &source.join("data/default.dungeondraft_tags"),
            r#"{"tags": {"Bones": ["Bones/bone.png"]}}"#,
        );
        touch(&source.join("textures/terrain/grass.png"), "img");
        let destination = dir.path().join("out");

        // No convertible files, so the encoder path is never invoked.
        let encoder = dir.path().join("cwebp-unused");
        let stats = convert_with(&encoder, &source, &destination).unwrap();
        assert_eq!(stats.converted, 0);
        assert_eq!(stats.copied, 1);
        assert_eq!(stats.manifests_rewritten, 1);
        assert_eq!(stats.skipped_existing, 0);

        let rewritten =
            fs::read_to_string(destination.join("data/default.dungeondraft_tags")).unwrap();
        assert!(rewritten.contains("Bones/bone.webp"), "{rewritten}");
        assert!(!rewritten.contains(".png"), "{rewritten}");
        assert!(destination.join("textures/terrain/grass.png").is_file());

        let again = convert_with(&encoder, &source, &destination).unwrap();
        assert_eq!(again.skipped_existing, 2);
        assert_eq!(again.converted + again.copied + again.manifests_rewritten, 0);
    }

    #[cfg(unix)]
    #[test]
    fn object_images_run_through_the_encoder() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let encoder = dir.path().join("cwebp");
        fs::write(&encoder, "#!/bin/sh\ncp \"$1\" \"$3\"\n").unwrap();
        fs::set_permissions(&encoder, fs::Permissions::from_mode(0o755)).unwrap();

        let source = dir.path().join("pack");
        touch(&source.join("textures/objects/Trees/Oak.png"), "img");
        touch(&source.join("textures/objects/done.webp"), "img");
        let destination = dir.path().join("out");

        let stats = convert_with(&encoder, &source, &destination).unwrap();
        assert_eq!(stats.converted, 1);
        assert_eq!(stats.copied, 1);
        assert!(destination.join("textures/objects/Trees/Oak.webp").is_file());
        assert!(!destination.join("textures/objects/Trees/Oak.png").exists());
        assert!(destination.join("textures/objects/done.webp").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn encoder_failure_aborts_the_run() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let encoder = dir.path().join("cwebp");
        fs::write(&encoder, "#!/bin/sh\nexit 3\n").unwrap();
        fs::set_permissions(&encoder, fs::Permissions::from_mode(0o755)).unwrap();

        let source = dir.path().join("pack");
        touch(&source.join("textures/objects/Oak.png"), "img");
        let destination = dir.path().join("out");

        let err = convert_with(&encoder, &source, &destination).unwrap_err();
        assert!(matches!(err, PackError::ConverterFailed { .. }));
    }
}
