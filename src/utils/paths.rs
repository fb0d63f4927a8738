use std::path::{Component, Path, PathBuf};

use crate::error::{PackError, Result};

/// Characters that cannot appear in a file or folder name.
pub const ILLEGAL_NAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Check a user-supplied name for characters that cannot appear in a path
/// segment. `what` names the offending option in the error message.
pub fn validate_name(what: &'static str, value: &str) -> Result<()> {
    if value.is_empty() || value.chars().any(|c| ILLEGAL_NAME_CHARS.contains(&c)) {
        return Err(PackError::InvalidName {
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Render a relative path with forward slashes, the only separator the tag
/// manifest format accepts.
pub fn to_forward_slashes(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}

fn component_eq(component: Component<'_>, expected: &str) -> bool {
    component
        .as_os_str()
        .to_str()
        .map_or(false, |s| s.eq_ignore_ascii_case(expected))
}

/// True when the relative path starts with the given components, compared
/// ignoring ASCII case.
pub fn starts_with_components(path: &Path, prefix: &[&str]) -> bool {
    let mut components = path.components();
    prefix
        .iter()
        .all(|expected| components.next().map_or(false, |c| component_eq(c, expected)))
}

/// Strip the given leading components (ignoring ASCII case), returning the
/// remainder, or None when the path does not start with them.
pub fn strip_components_prefix(path: &Path, prefix: &[&str]) -> Option<PathBuf> {
    let mut components = path.components();
    for expected in prefix {
        if !components.next().map_or(false, |c| component_eq(c, expected)) {
            return None;
        }
    }
    Some(components.as_path().to_path_buf())
}

/// True when some directory segment of the relative path equals `segment`
/// ignoring ASCII case. The file name itself is not considered.
pub fn has_dir_segment(path: &Path, segment: &str) -> bool {
    path.parent().map_or(false, |parent| {
        parent.components().any(|c| component_eq(c, segment))
    })
}
