//! Sort downloaded episodes into per-series folders.
//!
//! Episode files named `[Group] Series - 01.mkv` are moved into a folder named `[Group] Series`.
//! When a series already has a folder from a different group,
//! the folder is renamed to `[Multiple groups] Series`.

mod classify;
mod engine;
mod error;
mod fs;
mod index;
mod parse;
mod stats;

pub use classify::{DEFAULT_EXTENSIONS, MediaClassifier, VideoClassifier, guess_mime_type};
pub use engine::{ItemOutcome, RunResult, SortContext, Verbosity, reconcile};
pub use error::{FailureKind, FsError, IndexError, SortError};
pub use fs::{DryRunFileSystem, FileSystem, Listing, LocalFileSystem};
pub use index::{FolderDescriptor, Index, build_index};
pub use parse::{MULTIPLE_GROUPS, NameKind, SeriesIdentity, format_folder_name, parse_name, release_group_of};
pub use stats::SortStats;
