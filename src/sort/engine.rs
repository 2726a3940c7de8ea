//! Sort episodes from the unsorted directory into series folders.
//!
//! Each eligible file ends up in one of three places:
//! an existing folder for the same group (or a `[Multiple groups]` folder),
//! an existing folder renamed to `[Multiple groups] <series>` because the group differs,
//! or a new `[<group>] <series>` folder.
//! The folder index is updated after every structural change,
//! so later files in the same run see the new folder names.

use std::path::{Path, PathBuf};

use tracing::level_filters::LevelFilter;

use crate::sort::classify::MediaClassifier;
use crate::sort::error::SortError;
use crate::sort::fs::{FileSystem, Listing};
use crate::sort::index::{FolderDescriptor, Index, build_index};
use crate::sort::parse::{MULTIPLE_GROUPS, NameKind, SeriesIdentity, parse_name};
use crate::sort::stats::SortStats;

/// Output verbosity, from least to most output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Errors and warnings
    #[default]
    Normal,
    /// Informational messages for every change
    Verbose,
    /// Everything
    Debug,
}

/// Everything a sorting run needs besides the two directories.
pub struct SortContext<'a> {
    fs: &'a dyn FileSystem,
    classifier: &'a dyn MediaClassifier,
    backup_root: Option<PathBuf>,
    overwrite: bool,
    verbosity: Verbosity,
}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Moved into an existing folder.
    DirectMove,
    /// Folder renamed to `[Multiple groups]` and the file moved into it.
    ConflictRename,
    /// New folder created and the file moved into it.
    NewFolder,
    /// Name did not match the expected format.
    Skipped,
    /// A filesystem operation failed and the file was left in place.
    Failed,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunResult {
    /// True if any weak error occurred.
    pub anomalies_detected: bool,
    pub stats: SortStats,
    /// Folder index as it was at the end of the run.
    pub index: Index,
    verbosity: Verbosity,
}

/// State for a single run.
struct Reconciler<'a> {
    context: &'a SortContext<'a>,
    unsorted_root: &'a Path,
    sorted_root: &'a Path,
    index: Index,
    stats: SortStats,
    weak_error: bool,
}

impl Verbosity {
    /// Most verbose log level to show.
    #[must_use]
    pub const fn level_filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::ERROR,
            Self::Normal => LevelFilter::WARN,
            Self::Verbose => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
        }
    }

    /// True if informational messages are shown.
    #[must_use]
    pub const fn is_informational(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }
}

impl<'a> SortContext<'a> {
    #[must_use]
    pub const fn new(fs: &'a dyn FileSystem, classifier: &'a dyn MediaClassifier) -> Self {
        Self {
            fs,
            classifier,
            backup_root: None,
            overwrite: false,
            verbosity: Verbosity::Normal,
        }
    }

    /// Mirror folder creation and renames to this directory and copy each file there before moving it.
    #[must_use]
    pub fn with_backup(mut self, backup_root: Option<PathBuf>) -> Self {
        self.backup_root = backup_root;
        self
    }

    /// Replace files that already exist in the target folder.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

impl RunResult {
    /// True if weak errors occurred and the output is verbose enough that the user should look at it.
    #[must_use]
    pub const fn needs_attention(&self) -> bool {
        self.anomalies_detected && self.verbosity.is_informational()
    }
}

/// Sort eligible files in `unsorted_root` into series folders under `sorted_root`.
///
/// Both roots may be the same directory.
/// Recoverable problems are logged and reported through [`RunResult::anomalies_detected`].
///
/// # Errors
/// Returns an error if either root can not be listed,
/// or if an indexed folder has lost its `[group]` prefix, which stops the run.
pub fn reconcile(unsorted_root: &Path, sorted_root: &Path, context: &SortContext<'_>) -> Result<RunResult, SortError> {
    let span = tracing::info_span!(
        "reconcile",
        unsorted = %unsorted_root.display(),
        sorted = %sorted_root.display()
    );
    let _guard = span.enter();

    let mut reconciler = Reconciler::new(context, unsorted_root, sorted_root);
    let items = reconciler.list(unsorted_root)?.files;
    reconciler.load_index()?;

    reconciler.process_items(&items)?;

    Ok(reconciler.finish())
}

impl<'a> Reconciler<'a> {
    fn new(context: &'a SortContext<'a>, unsorted_root: &'a Path, sorted_root: &'a Path) -> Self {
        Self {
            context,
            unsorted_root,
            sorted_root,
            index: Index::default(),
            stats: SortStats::default(),
            weak_error: false,
        }
    }

    fn list(&self, dir: &Path) -> Result<Listing, SortError> {
        self.context.fs.list(dir).map_err(|source| SortError::Listing {
            path: dir.to_path_buf(),
            source,
        })
    }

    fn load_index(&mut self) -> Result<(), SortError> {
        let listing = self.list(self.sorted_root)?;
        self.set_index(build_index(&listing.directories));
        Ok(())
    }

    fn set_index(&mut self, index: Index) {
        if index.has_duplicates() {
            self.weak_error = true;
        }
        self.index = index;
    }

    /// Throw away the index and build it again from the sorted directory.
    /// Keeps the current index if listing fails.
    fn rebuild_index(&mut self) {
        match self.list(self.sorted_root) {
            Ok(listing) => {
                self.set_index(build_index(&listing.directories));
                tracing::info!(series = self.index.len(), "Rebuilt folder index");
            }
            Err(error) => {
                tracing::error!(%error, "Could not rebuild folder index");
                self.weak_error = true;
            }
        }
    }

    fn finish(self) -> RunResult {
        RunResult {
            anomalies_detected: self.weak_error,
            stats: self.stats,
            index: self.index,
            verbosity: self.context.verbosity,
        }
    }

    /// Sort eligible items in order, stopping at the first critical error.
    fn process_items(&mut self, items: &[String]) -> Result<(), SortError> {
        for item in items {
            if !self.context.classifier.is_eligible(item) {
                tracing::debug!(item = %item, "Ignoring file that is not an episode");
                continue;
            }
            self.process_item(item)?;
        }
        Ok(())
    }

    fn fail(&mut self) {
        self.weak_error = true;
        self.stats.inc_failed();
    }

    fn outcome(succeeded: bool, outcome: ItemOutcome) -> ItemOutcome {
        if succeeded { outcome } else { ItemOutcome::Failed }
    }

    /// Sort one file.
    /// Only a folder that no longer has a `[group]` prefix is returned as an error.
    fn process_item(&mut self, item: &str) -> Result<ItemOutcome, SortError> {
        let identity = match parse_name(item, NameKind::File) {
            Ok(identity) => identity,
            Err(error) => {
                tracing::warn!(%error, "Skipped {item} for not having the correct format");
                self.weak_error = true;
                self.stats.inc_skipped();
                return Ok(ItemOutcome::Skipped);
            }
        };

        let Some(descriptor) = self.index.get(&identity.series_name).cloned() else {
            return Ok(self.create_folder_and_move(item, &identity));
        };

        let Some(folder_group) = descriptor.release_group() else {
            let error = SortError::CriticalStructuralInconsistency {
                folder: descriptor.folder_name().to_string(),
                series: identity.series_name,
            };
            tracing::error!(critical = true, %error, "Critical folder naming error, stopping");
            return Err(error);
        };

        if folder_group == MULTIPLE_GROUPS || folder_group == identity.release_group {
            let moved = self.move_item(item, descriptor.folder_name());
            Ok(Self::outcome(moved, ItemOutcome::DirectMove))
        } else {
            tracing::debug!(
                series = %identity.series_name,
                folder_group = %folder_group,
                item_group = %identity.release_group,
                "Release group differs from folder"
            );
            Ok(self.rename_and_move(item, &descriptor))
        }
    }

    fn create_folder_and_move(&mut self, item: &str, identity: &SeriesIdentity) -> ItemOutcome {
        let context = self.context;
        let descriptor = FolderDescriptor::for_identity(identity);
        let path = self.sorted_root.join(descriptor.folder_name());

        if let Err(source) = context.fs.create_dir_all(&path) {
            let error = SortError::CreateFailed { path, source };
            tracing::error!(%error, "Could not create a folder for {item}");
            self.fail();
            return ItemOutcome::Failed;
        }
        self.mirror_create(descriptor.folder_name());
        tracing::info!(folder = descriptor.folder_name(), "Created a new folder for {}", identity.series_name);
        self.stats.inc_created();

        let mut target_folder = descriptor.folder_name().to_string();
        if let Err(error) = self.index.register(descriptor) {
            let error = SortError::from(error);
            tracing::error!(%error, "Failed to update the folder index, rebuilding");
            self.weak_error = true;
            self.rebuild_index();
            if let Some(existing) = self.index.get(&identity.series_name) {
                target_folder = existing.folder_name().to_string();
            }
        }

        let moved = self.move_item(item, &target_folder);
        Self::outcome(moved, ItemOutcome::NewFolder)
    }

    fn rename_and_move(&mut self, item: &str, descriptor: &FolderDescriptor) -> ItemOutcome {
        let context = self.context;
        let renamed = FolderDescriptor::multiple_groups(descriptor.series_name());
        let from = self.sorted_root.join(descriptor.folder_name());
        let to = self.sorted_root.join(renamed.folder_name());

        if let Err(source) = context.fs.rename_dir(&from, &to) {
            let error = SortError::RenameFailed { from, to, source };
            tracing::error!(%error, "Could not rename folder, leaving {item} in place");
            self.fail();
            return ItemOutcome::Failed;
        }
        self.mirror_rename(descriptor.folder_name(), renamed.folder_name());
        tracing::info!(
            from = descriptor.folder_name(),
            to = renamed.folder_name(),
            "Renamed the folder for {}",
            descriptor.series_name()
        );
        self.stats.inc_renamed();

        let target_folder = renamed.folder_name().to_string();
        if let Err(error) = self.index.replace(renamed) {
            let error = SortError::from(error);
            tracing::error!(%error, "Failed to update the folder index, rebuilding");
            self.weak_error = true;
            self.rebuild_index();
        }

        let moved = self.move_item(item, &target_folder);
        Self::outcome(moved, ItemOutcome::ConflictRename)
    }

    /// Move a file from the unsorted directory into a series folder, backing it up first if configured.
    fn move_item(&mut self, item: &str, folder_name: &str) -> bool {
        let context = self.context;
        let source = self.unsorted_root.join(item);

        if let Some(backup_root) = &context.backup_root {
            let backup = backup_root.join(folder_name).join(item);
            if let Err(error) = context.fs.copy_file(&source, &backup) {
                let error = SortError::BackupFailed {
                    from: source,
                    to: backup,
                    source: error,
                };
                tracing::warn!(%error, "Could not back up {item}");
                self.fail();
                return false;
            }
            tracing::info!(backup = %backup_root.display(), "Created a backup of {item}");
        }

        let target = self.sorted_root.join(folder_name).join(item);
        match context.fs.move_file(&source, &target, context.overwrite) {
            Ok(()) => {
                tracing::info!(folder = folder_name, "Moved {item}");
                self.stats.inc_moved();
                true
            }
            Err(error) => {
                let error = SortError::MoveFailed {
                    from: source,
                    to: target,
                    source: error,
                };
                tracing::warn!(%error, "Could not move {item}");
                self.fail();
                false
            }
        }
    }

    fn mirror_create(&mut self, folder_name: &str) {
        let context = self.context;
        let Some(backup_root) = &context.backup_root else {
            return;
        };
        let path = backup_root.join(folder_name);
        if let Err(source) = context.fs.create_dir_all(&path) {
            let error = SortError::CreateFailed { path, source };
            tracing::warn!(%error, "Could not create backup folder");
            self.weak_error = true;
        }
    }

    fn mirror_rename(&mut self, from_name: &str, to_name: &str) {
        let context = self.context;
        let Some(backup_root) = &context.backup_root else {
            return;
        };
        let from = backup_root.join(from_name);
        let to = backup_root.join(to_name);
        if let Err(source) = context.fs.rename_dir(&from, &to) {
            let error = SortError::RenameFailed { from, to, source };
            tracing::warn!(%error, "Could not rename backup folder");
            self.weak_error = true;
        }
    }
}
