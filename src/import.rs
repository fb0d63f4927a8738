use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PackError, Result};
use crate::pack::{quality, Category, QualityTier, OBJECTS_SUBDIR, PORTALS_SUBDIR};
use crate::tags;
use crate::utils::{files, flags, paths};

/// Importer parameters
#[derive(Parser, Debug)]
#[command(about = "Import the best quality tier of each symbol into an asset pack")]
pub struct ImportArgs {
    /// Path to the external symbol library to import from
    pub source: String,

    /// Asset-pack root the surviving files are copied into
    pub destination: String,

    /// Build data/default.dungeondraft_tags after copying (true/false)
    #[arg(long, default_value = "true", value_parser = flags::parse_bool_flag)]
    pub create_tag_file: bool,

    /// Route door and window assets to textures/portals (true/false)
    #[arg(long, default_value = "true", value_parser = flags::parse_bool_flag)]
    pub route_portals: bool,
}

/// One source file that survived the low-quality filter.
#[derive(Debug)]
struct Candidate {
    /// Path relative to the source root.
    rel: PathBuf,
    /// Lowercased stem with any quality suffix removed; tier resolution
    /// compares candidates through this key.
    key: String,
    tier: QualityTier,
    category: Category,
}

/// Statistics for one import run
#[derive(Debug, Default)]
pub struct ImportStats {
    pub copied: usize,
    pub skipped_existing: usize,
    pub dropped_low_quality: usize,
    pub dropped_shadowed: usize,
}

/// Copy the best-quality version of each distinct symbol from an external
/// library into the destination pack's objects and portals trees.
pub fn import_symbols(args: ImportArgs) -> Result<ImportStats> {
    let source = Path::new(&args.source);
    if !source.is_dir() {
        return Err(PackError::PathNotFound(source.to_path_buf()));
    }
    let destination = Path::new(&args.destination);
    // The destination folder name becomes the pack's set name when the tag
    // post-step runs; check it before any file is touched.
    let pack_name = match destination.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => {
            return Err(PackError::InvalidName {
                what: "pack folder name",
                value: destination.display().to_string(),
            })
        }
    };
    paths::validate_name("pack folder name", &pack_name)?;

    println!("Importing symbols from: {}", source.display());
    println!("Destination pack: {}", destination.display());

    let (candidates, dropped_low_quality) = scan_candidates(source)?;
    println!(
        "Found {} candidate files ({} low-quality files dropped)",
        candidates.len(),
        dropped_low_quality
    );

    let best = best_tiers(&candidates);
    let survivors: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| best[&(c.category, c.key.as_str())] == c.tier)
        .collect();
    let dropped_shadowed = candidates.len() - survivors.len();

    let targets: Vec<PathBuf> = survivors
        .iter()
        .map(|c| destination.join(destination_rel_path(&c.rel, c.category, args.route_portals)))
        .collect();

    // All directories exist before any file is written.
    let mut dirs = vec![destination.join(OBJECTS_SUBDIR)];
    if args.route_portals {
        dirs.push(destination.join(PORTALS_SUBDIR));
    }
    for target in &targets {
        if let Some(parent) = target.parent() {
            dirs.push(parent.to_path_buf());
        }
    }
    dirs.sort();
    dirs.dedup();
    files::create_missing_dirs(&dirs)?;

    let existing = files::batch_check_existing(&targets);

    let pb = ProgressBar::new(survivors.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut stats = ImportStats::default();
    stats.dropped_low_quality = dropped_low_quality;
    stats.dropped_shadowed = dropped_shadowed;

    for ((candidate, target), exists) in survivors.iter().zip(&targets).zip(&existing) {
        if *exists {
            stats.skipped_existing += 1;
        } else {
            fs::copy(source.join(&candidate.rel), target)?;
            stats.copied += 1;
        }
        pb.inc(1);
    }
    pb.finish_with_message("Import complete!");

    if args.create_tag_file {
        println!("\nBuilding tag manifest...");
        tags::generate(destination, None, &[], &[])?;
    }

    print_import_stats(&stats);
    Ok(stats)
}

/// Walk the source tree, drop reserved low-quality files, and classify the
/// rest by tier and category. Returns the candidates and the dropped count.
fn scan_candidates(source: &Path) -> Result<(Vec<Candidate>, usize)> {
    let mut candidates = Vec::new();
    let mut dropped = 0usize;
    for rel in files::collect_files(source)? {
        let name = match rel.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        let stem = match rel.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => continue,
        };
        if quality::is_low_quality(&stem) {
            dropped += 1;
            continue;
        }
        let (base, tier) = quality::split_quality(&stem);
        candidates.push(Candidate {
            key: base.to_ascii_lowercase(),
            tier,
            category: Category::of_filename(&name),
            rel,
        });
    }
    Ok((candidates, dropped))
}

/// Highest tier present for every (category, stripped base name) pair.
fn best_tiers(candidates: &[Candidate]) -> HashMap<(Category, &str), QualityTier> {
    let mut best: HashMap<(Category, &str), QualityTier> = HashMap::new();
    for candidate in candidates {
        let entry = best
            .entry((candidate.category, candidate.key.as_str()))
            .or_insert(candidate.tier);
        if candidate.tier > *entry {
            *entry = candidate.tier;
        }
    }
    best
}

/// Destination path for a surviving file, relative to the pack root. Any
/// recognized category prefix already present in the source tree is
/// stripped before the file is placed under the objects or portals tree.
fn destination_rel_path(rel: &Path, category: Category, route_portals: bool) -> PathBuf {
    let sub = strip_category_prefix(rel);
    let base = match category {
        Category::Portal if route_portals => PORTALS_SUBDIR,
        _ => OBJECTS_SUBDIR,
    };
    Path::new(base).join(sub)
}

/// Strip a leading `textures/objects`, `textures/portals`, `objects`, or
/// `portals` from a source-relative path, ignoring ASCII case.
fn strip_category_prefix(rel: &Path) -> PathBuf {
    const PREFIXES: [&[&str]; 4] = [
        &["textures", "objects"],
        &["textures", "portals"],
        &["objects"],
        &["portals"],
    ];
    for prefix in PREFIXES {
        if let Some(stripped) = paths::strip_components_prefix(rel, prefix) {
            return stripped;
        }
    }
    rel.to_path_buf()
}

/// Print import statistics
fn print_import_stats(stats: &ImportStats) {
    println!("\n🎯 Import Statistics:");
    println!("  📄 Files copied: {}", stats.copied);
    println!("  ⏭️  Skipped (already existed): {}", stats.skipped_existing);
    println!("  🗑️  Dropped low-quality files: {}", stats.dropped_low_quality);
    println!("  🔄 Dropped lower-tier duplicates: {}", stats.dropped_shadowed);
}
