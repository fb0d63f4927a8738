/// Resolution rank encoded in a symbol's filename suffix.
///
/// Ordered by fidelity, so comparing tiers picks the best available
/// variant of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityTier {
    Standard,
    High,
    VeryHigh,
}

/// Door and window assets get routed away from generic objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Object,
    Portal,
}

/// Filename prefixes that mark a portal asset. Matching is case-sensitive
/// and includes the trailing space.
const PORTAL_PREFIXES: [&str; 4] = ["Door ", "Doors ", "Window ", "Windows "];

/// Markers for resolutions below standard; such files are never imported.
const LOW_QUALITY_SUFFIXES: [&str; 2] = ["_LO", "_VL"];

impl Category {
    /// Classify a file by name prefix: `Portal` for door/window names,
    /// `Object` for everything else.
    pub fn of_filename(name: &str) -> Self {
        if PORTAL_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
            Category::Portal
        } else {
            Category::Object
        }
    }
}

fn ends_with_ignore_case(stem: &str, suffix: &str) -> bool {
    let (stem, suffix) = (stem.as_bytes(), suffix.as_bytes());
    stem.len() >= suffix.len() && stem[stem.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Split a file stem into its base name and quality tier. The `_VH`/`_HI`
/// markers compare ASCII case-insensitively; the returned base has the
/// marker removed. No marker means `Standard` and the stem is returned
/// unchanged.
pub fn split_quality(stem: &str) -> (&str, QualityTier) {
    if ends_with_ignore_case(stem, "_VH") {
        (&stem[..stem.len() - 3], QualityTier::VeryHigh)
    } else if ends_with_ignore_case(stem, "_HI") {
        (&stem[..stem.len() - 3], QualityTier::High)
    } else {
        (stem, QualityTier::Standard)
    }
}

/// True for stems carrying a reserved low-quality marker.
pub fn is_low_quality(stem: &str) -> bool {
    LOW_QUALITY_SUFFIXES
        .iter()
        .any(|suffix| ends_with_ignore_case(stem, suffix))
}
