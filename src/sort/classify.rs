//! Decide which files in the unsorted directory are episodes to sort.

use std::path::Path;

use crate::path_to_file_extension_string;

/// Default extensions to sort.
pub const DEFAULT_EXTENSIONS: &[&str] = &["mkv"];

/// Known MIME types by lowercase file extension.
const MIME_TYPES: &[(&str, &str)] = &[
    ("3gp", "video/3gpp"),
    ("avi", "video/x-msvideo"),
    ("flv", "video/x-flv"),
    ("m2ts", "video/mp2t"),
    ("m4v", "video/x-m4v"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("mp4", "video/mp4"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("ogv", "video/ogg"),
    ("ts", "video/mp2t"),
    ("webm", "video/webm"),
    ("wmv", "video/x-ms-wmv"),
    ("ass", "text/x-ssa"),
    ("mka", "audio/x-matroska"),
    ("nfo", "text/plain"),
    ("srt", "application/x-subrip"),
    ("torrent", "application/x-bittorrent"),
    ("txt", "text/plain"),
];

/// Content type check used to pick sortable files.
pub trait MediaClassifier {
    /// Return true if the file with this name should be sorted.
    fn is_eligible(&self, file_name: &str) -> bool;
}

/// Accepts files with one of the configured extensions whose guessed content type is video.
#[derive(Debug, Clone)]
pub struct VideoClassifier {
    extensions: Vec<String>,
}

impl VideoClassifier {
    /// Create a classifier for the given extensions (without the leading dot, any case).
    #[must_use]
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        let extensions = extensions
            .iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Default for VideoClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

impl MediaClassifier for VideoClassifier {
    fn is_eligible(&self, file_name: &str) -> bool {
        let extension = path_to_file_extension_string(Path::new(file_name));
        self.extensions.contains(&extension) && guess_mime_type(file_name).is_some_and(|mime| mime.starts_with("video/"))
    }
}

/// Guess the MIME type of a file from its extension.
#[must_use]
pub fn guess_mime_type(file_name: &str) -> Option<&'static str> {
    let extension = path_to_file_extension_string(Path::new(file_name));
    if extension.is_empty() {
        return None;
    }
    MIME_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}
