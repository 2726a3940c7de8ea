//! Mapping from series name to the top-level folder holding its episodes.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use itertools::Itertools;

use crate::sort::error::{IndexError, SortError};
use crate::sort::parse::{MULTIPLE_GROUPS, NameKind, SeriesIdentity, format_folder_name, parse_name, release_group_of};

/// One series folder in the sorted directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderDescriptor {
    /// Literal folder name on disk.
    pub(crate) folder_name: String,
    pub(crate) series_name: String,
}

/// Series folders keyed by series name.
///
/// Holds at most one folder per series.
/// Folders that share a series with an earlier folder are recorded as duplicates.
#[derive(Debug, Default, Clone)]
pub struct Index {
    entries: HashMap<String, FolderDescriptor>,
    duplicates: Vec<String>,
}

impl FolderDescriptor {
    /// Create a descriptor from an existing folder name.
    ///
    /// # Errors
    /// Returns [`SortError::MalformedName`] if the folder is not a `[group] series` folder.
    pub fn from_folder_name(folder_name: &str) -> Result<Self, SortError> {
        let identity = parse_name(folder_name, NameKind::Folder)?;
        Ok(Self {
            folder_name: folder_name.to_string(),
            series_name: identity.series_name,
        })
    }

    /// Descriptor for a new folder named after the given episode identity.
    #[must_use]
    pub fn for_identity(identity: &SeriesIdentity) -> Self {
        Self {
            folder_name: identity.folder_name(),
            series_name: identity.series_name.clone(),
        }
    }

    /// Descriptor for the folder of a series with episodes from several groups.
    #[must_use]
    pub fn multiple_groups(series_name: &str) -> Self {
        Self {
            folder_name: format_folder_name(MULTIPLE_GROUPS, series_name),
            series_name: series_name.to_string(),
        }
    }

    #[must_use]
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    #[must_use]
    pub fn series_name(&self) -> &str {
        &self.series_name
    }

    /// Release group tag, derived from the folder name when asked for.
    ///
    /// Returns `None` if the folder name no longer has a `]`.
    #[must_use]
    pub fn release_group(&self) -> Option<String> {
        release_group_of(&self.folder_name)
    }
}

impl fmt::Display for FolderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.folder_name)
    }
}

impl Index {
    #[must_use]
    pub fn get(&self, series_name: &str) -> Option<&FolderDescriptor> {
        self.entries.get(series_name)
    }

    #[must_use]
    pub fn contains(&self, series_name: &str) -> bool {
        self.entries.contains_key(series_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Folder names that were ignored because their series already had a folder.
    #[must_use]
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    /// Add a folder for a series that has none yet.
    ///
    /// # Errors
    /// Returns [`IndexError::Occupied`] if the series already has a folder.
    pub fn register(&mut self, descriptor: FolderDescriptor) -> Result<(), IndexError> {
        match self.entries.entry(descriptor.series_name.clone()) {
            Entry::Occupied(entry) => Err(IndexError::Occupied(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(descriptor);
                Ok(())
            }
        }
    }

    /// Swap the folder of an already indexed series, returning the previous one.
    ///
    /// # Errors
    /// Returns [`IndexError::Vacant`] if the series has no folder.
    pub fn replace(&mut self, descriptor: FolderDescriptor) -> Result<FolderDescriptor, IndexError> {
        match self.entries.get_mut(&descriptor.series_name) {
            Some(existing) => Ok(std::mem::replace(existing, descriptor)),
            None => Err(IndexError::Vacant(descriptor.series_name)),
        }
    }

    /// Descriptors sorted by series name.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &FolderDescriptor> {
        self.entries.values().sorted_unstable_by(|a, b| a.series_name.cmp(&b.series_name))
    }

    fn insert_first(&mut self, descriptor: FolderDescriptor) {
        let folder_name = descriptor.folder_name.clone();
        if let Err(IndexError::Occupied(series)) = self.register(descriptor) {
            let kept = self.entries.get(&series).map_or("", |existing| existing.folder_name.as_str());
            tracing::warn!(%series, folder = %folder_name, kept, "Found a series with more than one folder");
            self.duplicates.push(folder_name);
        }
    }
}

/// Build the index from top-level folder names in listing order.
///
/// Names that are not `[group] series` folders are skipped.
/// When several folders map to the same series the first one wins.
pub fn build_index<I, S>(folder_names: I) -> Index
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index = Index::default();
    for name in folder_names {
        let name = name.as_ref();
        match FolderDescriptor::from_folder_name(name) {
            Ok(descriptor) => index.insert_first(descriptor),
            Err(_) => tracing::debug!(folder = name, "Not a series folder"),
        }
    }
    tracing::debug!(series = index.len(), duplicates = index.duplicates.len(), "Built folder index");
    index
}
