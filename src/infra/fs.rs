//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations,
//! such as resolving user-supplied paths and reading files with context.
//!
//! 此模块提供文件系统操作的实用功能，
//! 如解析用户提供的路径和带上下文地读取文件。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Expands a leading `~` in a user-supplied path to the home directory.
///
/// # Arguments
/// * `path` - Path as given on the command line
///
/// # Returns
/// The expanded path; unchanged when there is nothing to expand
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Gets the absolute path from a potentially relative path.
///
/// # Arguments
/// * `path` - Path to canonicalize
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}

/// Reads a whole file to a string, naming the file on failure.
///
/// # Arguments
/// * `path` - Path of the file to read
///
/// # Returns
/// The file contents, or a contextful error
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Checks if a path exists and is a directory.
///
/// # Arguments
/// * `path` - Path to check
///
/// # Returns
/// `true` if the path exists and is a directory, `false` otherwise
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}
