//! Cleanup for the simulator's non-standard session YAML
//!
//! Driver and team names are written unquoted, so a name such as `O'Connor, Mike` or
//! `"Fast" Eddie` breaks a conforming parser. Control characters also leak into the text.
//! See <https://forums.iracing.com/discussion/comment/374646#Comment_374646>.

use crate::{Result, StandingsError};

/// Keys whose values are free text typed by users.
const FREE_TEXT_KEYS: &[&str] = &[
    "AbbrevName:",
    "TeamName:",
    "UserName:",
    "Initials:",
    "DriverSetupName:",
    "CarDesignStr:",
];

/// Strip control characters and single-quote free-text values.
pub fn preprocess_session_yaml(yaml: &str) -> Result<String> {
    let cleaned: String =
        yaml.chars().filter(|&ch| !ch.is_control() || matches!(ch, '\n' | '\r' | '\t')).collect();

    if cleaned.trim().is_empty() {
        return Err(StandingsError::parse_error(
            "Session YAML preprocessing",
            "YAML is empty after preprocessing",
        ));
    }

    let lines: Vec<String> = cleaned.lines().map(quote_free_text).collect();
    Ok(lines.join("\n"))
}

fn quote_free_text(line: &str) -> String {
    let Some((key, key_pos)) =
        FREE_TEXT_KEYS.iter().find_map(|key| line.find(key).map(|pos| (*key, pos)))
    else {
        return line.to_string();
    };

    let after_key = key_pos + key.len();
    let rest = &line[after_key..];
    let value = rest.trim();
    if value.is_empty() || value.starts_with('\'') || value.starts_with('"') {
        return line.to_string();
    }

    format!("{} '{}'", &line[..after_key], value.replace('\'', "''"))
}
