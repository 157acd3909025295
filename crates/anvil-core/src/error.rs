//! Error types shared across the workspace.
//!
//! Every fallible operation in the unit engine surfaces one of the kinds
//! named here. Each carries a short machine-readable code plus a
//! human-oriented message, so the CLI layer can print consistent
//! diagnostics without re-deriving context the library already had.

use std::fmt;
use std::path::{Path, PathBuf};

/// Machine-readable error codes, grouped by the component that raises them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Semantic,
    BrokenDependency,
    Conflict,
    PackageNotAllowed,
    InstallError,
    UninstallError,
    DownloadError,
    RepositoryError,
    ClearError,
    SyncError,
    EnableError,
    Io,
    Yaml,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Semantic => "E-SEMANTIC",
            Self::BrokenDependency => "E-BROKEN-DEPENDENCY",
            Self::Conflict => "E-CONFLICT",
            Self::PackageNotAllowed => "E-PACKAGE-NOT-ALLOWED",
            Self::InstallError => "E-INSTALL",
            Self::UninstallError => "E-UNINSTALL",
            Self::DownloadError => "E-DOWNLOAD",
            Self::RepositoryError => "E-REPOSITORY",
            Self::ClearError => "E-CLEAR",
            Self::SyncError => "E-SYNC",
            Self::EnableError => "E-ENABLE",
            Self::Io => "E-IO",
            Self::Yaml => "E-YAML",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result type used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{message}")]
    Semantic { message: String },

    #[error("cannot locate a provider for '{target}' required by {unit}")]
    BrokenDependency { unit: String, target: String },

    #[error("{a} conflicts with {b}")]
    Conflict { a: String, b: String },

    #[error("{unit} is not allowed by the current configuration")]
    PackageNotAllowed { unit: String },

    #[error("failed to install {package}: {message}")]
    InstallError { package: String, message: String },

    #[error("failed to uninstall {package}: {message}")]
    UninstallError { package: String, message: String },

    #[error("failed to download {package}: {message}")]
    DownloadError { package: String, message: String },

    #[error("unknown repository '{name}'")]
    RepositoryError { name: String },

    #[error("failed to clear cache: {message}")]
    ClearError { message: String },

    #[error("sync failed: {message}")]
    SyncError { message: String },

    #[error("failed to enable local repository at {path}: {message}")]
    EnableError { path: PathBuf, message: String },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Semantic { .. } => ErrorCode::Semantic,
            Self::BrokenDependency { .. } => ErrorCode::BrokenDependency,
            Self::Conflict { .. } => ErrorCode::Conflict,
            Self::PackageNotAllowed { .. } => ErrorCode::PackageNotAllowed,
            Self::InstallError { .. } => ErrorCode::InstallError,
            Self::UninstallError { .. } => ErrorCode::UninstallError,
            Self::DownloadError { .. } => ErrorCode::DownloadError,
            Self::RepositoryError { .. } => ErrorCode::RepositoryError,
            Self::ClearError { .. } => ErrorCode::ClearError,
            Self::SyncError { .. } => ErrorCode::SyncError,
            Self::EnableError { .. } => ErrorCode::EnableError,
            Self::Io { .. } => ErrorCode::Io,
            Self::Yaml(_) => ErrorCode::Yaml,
        }
    }

    pub fn semantic(message: impl Into<String>) -> Self {
        Self::Semantic { message: message.into() }
    }

    pub fn broken_dependency(unit: impl Into<String>, target: impl Into<String>) -> Self {
        Self::BrokenDependency { unit: unit.into(), target: target.into() }
    }

    pub fn conflict(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::Conflict { a: a.into(), b: b.into() }
    }

    pub fn package_not_allowed(unit: impl Into<String>) -> Self {
        Self::PackageNotAllowed { unit: unit.into() }
    }

    pub fn install_error(package: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InstallError { package: package.into(), message: message.into() }
    }

    pub fn uninstall_error(package: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UninstallError { package: package.into(), message: message.into() }
    }

    pub fn download_error(package: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DownloadError { package: package.into(), message: message.into() }
    }

    pub fn repository_error(name: impl Into<String>) -> Self {
        Self::RepositoryError { name: name.into() }
    }

    pub fn clear_error(message: impl Into<String>) -> Self {
        Self::ClearError { message: message.into() }
    }

    pub fn sync_error(message: impl Into<String>) -> Self {
        Self::SyncError { message: message.into() }
    }

    pub fn enable_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::EnableError { path: path.into(), message: message.into() }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io { path: path.as_ref().to_path_buf(), source }
    }
}
