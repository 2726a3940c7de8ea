//! Extract the release group and series name from episode filenames and series folder names.
//!
//! Expected episode format: `[Group] Series Name - 01 [1080p].mkv`.
//! Series folders use the same prefix without the episode part: `[Group] Series Name`.

use crate::sort::error::SortError;

/// Release group tag for a folder holding episodes from more than one group.
pub const MULTIPLE_GROUPS: &str = "Multiple groups";

/// Substrings an episode filename must contain before extraction is attempted.
const REQUIRED_FILE_TOKENS: [&str; 4] = ["]", "[", " -", "] "];

/// What kind of name is being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Episode filename, the trailing ` - <episode>` part is stripped.
    File,
    /// Top-level series folder name, used as is after the group prefix.
    Folder,
}

/// Release group and series name recovered from a file or folder name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesIdentity {
    pub release_group: String,
    pub series_name: String,
}

impl SeriesIdentity {
    /// Folder name for this series: `[<release_group>] <series_name>`.
    #[must_use]
    pub fn folder_name(&self) -> String {
        format_folder_name(&self.release_group, &self.series_name)
    }

    /// True if this identity belongs to a folder that has absorbed multiple groups.
    #[must_use]
    pub fn is_multiple_groups(&self) -> bool {
        self.release_group == MULTIPLE_GROUPS
    }
}

/// Parse a file or folder name into its release group and series name.
///
/// The group is the content of the first bracket pair,
/// and the series is the text after the first `] `.
/// For files the series name is cut at the last ` -`.
///
/// # Errors
/// Returns [`SortError::MalformedName`] if the name does not follow the expected format.
pub fn parse_name(name: &str, kind: NameKind) -> Result<SeriesIdentity, SortError> {
    let malformed = || SortError::MalformedName(name.to_string());

    if kind == NameKind::File && !REQUIRED_FILE_TOKENS.iter().all(|token| name.contains(token)) {
        return Err(malformed());
    }

    let (_, after_group) = name.split_once("] ").ok_or_else(malformed)?;
    let series_name = match kind {
        NameKind::File => after_group.rsplit_once(" -").map(|(series, _)| series).ok_or_else(malformed)?,
        NameKind::Folder => after_group,
    };
    let release_group = release_group_of(name).ok_or_else(malformed)?;

    Ok(SeriesIdentity {
        release_group,
        series_name: series_name.to_string(),
    })
}

/// Release group of a name: everything before the first `]` with the first `[` removed.
///
/// Returns `None` when the name has no `]` at all.
#[must_use]
pub fn release_group_of(name: &str) -> Option<String> {
    name.split_once(']').map(|(prefix, _)| prefix.replacen('[', "", 1))
}

/// Format a series folder name from its parts.
#[must_use]
pub fn format_folder_name(release_group: &str, series_name: &str) -> String {
    format!("[{release_group}] {series_name}")
}
