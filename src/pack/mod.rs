//! Domain model shared by the pack tools: quality tiers and categories on
//! the input side, the tag manifest document on the output side.

/// Object images live here, relative to the pack root.
pub const OBJECTS_SUBDIR: &str = "textures/objects";

/// Door and window images live here when portal routing is enabled.
pub const PORTALS_SUBDIR: &str = "textures/portals";

/// Fixed manifest location the consuming application reads.
pub const TAGS_FILE_SUBPATH: &str = "data/default.dungeondraft_tags";

/// Tag that aggregates colorable variants across the whole pack.
pub const COLORABLE_TAG: &str = "Colorable";

// Re-export the commonly used domain types
pub mod manifest;
pub mod quality;

pub use manifest::TagManifest;
pub use quality::{Category, QualityTier};
