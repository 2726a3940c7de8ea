//! Filesystem operations used while sorting.
//!
//! Listing is top-level only. Mutations report a [`FailureKind`](crate::sort::error::FailureKind)
//! so callers can tell missing paths from permission problems.

use std::fs;
use std::io;
use std::path::Path;

use colored::Colorize;
use walkdir::WalkDir;

use crate::sort::error::FsError;
use crate::{is_hidden, path_to_string_relative};

/// Top-level entries of a directory, in name order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Listing {
    pub files: Vec<String>,
    pub directories: Vec<String>,
}

/// Directory listing and mutation provider.
pub trait FileSystem {
    /// List the files and subdirectories directly inside `dir`.
    ///
    /// # Errors
    /// Returns an error if the directory can not be read.
    fn list(&self, dir: &Path) -> Result<Listing, FsError>;

    /// Move a file, failing with `AlreadyExists` if the target exists and `overwrite` is false.
    ///
    /// # Errors
    /// Returns an error if the file could not be moved.
    fn move_file(&self, from: &Path, to: &Path, overwrite: bool) -> Result<(), FsError>;

    /// Copy a file, replacing the target if it exists.
    ///
    /// # Errors
    /// Returns an error if the file could not be copied.
    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), FsError>;

    /// Create a directory and any missing parents.
    ///
    /// # Errors
    /// Returns an error if the directory could not be created.
    fn create_dir_all(&self, path: &Path) -> Result<(), FsError>;

    /// Rename a directory.
    ///
    /// # Errors
    /// Returns an error if the directory could not be renamed.
    fn rename_dir(&self, from: &Path, to: &Path) -> Result<(), FsError>;
}

/// Operates on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

/// Lists the local filesystem but only prints mutations.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunFileSystem;

impl FileSystem for LocalFileSystem {
    fn list(&self, dir: &Path) -> Result<Listing, FsError> {
        let mut listing = Listing::default();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(walkdir_to_io_error)?;
            if is_hidden(&entry) {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                tracing::warn!(path = %entry.path().display(), "Skipping entry with a non-UTF-8 name");
                continue;
            };
            let file_type = entry.file_type();
            if file_type.is_dir() {
                listing.directories.push(name);
            } else if file_type.is_file() {
                listing.files.push(name);
            }
        }
        Ok(listing)
    }

    fn move_file(&self, from: &Path, to: &Path, overwrite: bool) -> Result<(), FsError> {
        if !overwrite && to.exists() {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "destination file already exists").into());
        }
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::CrossesDevices => {
                tracing::debug!(from = %from.display(), to = %to.display(), "Copying across devices");
                fs::copy(from, to)?;
                fs::remove_file(from)?;
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        fs::copy(from, to)?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn rename_dir(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        if !from.is_dir() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "source directory does not exist").into());
        }
        fs::rename(from, to)?;
        Ok(())
    }
}

impl FileSystem for DryRunFileSystem {
    fn list(&self, dir: &Path) -> Result<Listing, FsError> {
        LocalFileSystem.list(dir)
    }

    fn move_file(&self, from: &Path, to: &Path, _overwrite: bool) -> Result<(), FsError> {
        println!(
            "{} {} -> {}",
            "Move:".cyan(),
            path_to_string_relative(from),
            path_to_string_relative(to)
        );
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        println!(
            "{} {} -> {}",
            "Copy:".blue(),
            path_to_string_relative(from),
            path_to_string_relative(to)
        );
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
        println!("{} {}", "Create:".green(), path_to_string_relative(path));
        Ok(())
    }

    fn rename_dir(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        println!(
            "{} {} -> {}",
            "Rename:".yellow(),
            path_to_string_relative(from),
            path_to_string_relative(to)
        );
        Ok(())
    }
}

fn walkdir_to_io_error(error: walkdir::Error) -> FsError {
    let message = error.to_string();
    error.into_io_error().unwrap_or_else(|| io::Error::other(message)).into()
}
