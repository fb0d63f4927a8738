use crate::error::PackError;

const TRUE_WORDS: [&str; 5] = ["true", "t", "yes", "y", "1"];
const FALSE_WORDS: [&str; 5] = ["false", "f", "no", "n", "0"];

/// Parse a boolean command-line value, accepting only the fixed spellings
/// above (ASCII case-insensitive). Wired into clap as a value parser, so a
/// rejected spelling prints usage help and exits non-zero.
pub fn parse_bool_flag(raw: &str) -> Result<bool, PackError> {
    let lowered = raw.to_ascii_lowercase();
    if TRUE_WORDS.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSE_WORDS.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(PackError::InvalidBoolFlag(raw.to_string()))
    }
}
