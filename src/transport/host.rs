//! Native host identity and launch configuration.
//!
//! Browsers resolve a reverse-DNS host name to an executable through a
//! manifest; here the two travel together in one injected config value.
//! The name validation mirrors what browsers enforce for native messaging
//! host identifiers.

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

// ============================================================================
// NativeHostConfig
// ============================================================================

/// Identity and launch command of the external native host.
///
/// # Example
///
/// ```
/// use scholar_capture::NativeHostConfig;
///
/// let host = NativeHostConfig::new("com.my_company.scholarcore", "/opt/scholarcore/host")
///     .arg("--stdio");
/// assert_eq!(host.name(), "com.my_company.scholarcore");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeHostConfig {
    /// Reverse-DNS host identifier.
    name: String,

    /// Host executable.
    program: PathBuf,

    /// Arguments passed to the executable.
    args: Vec<String>,
}

impl NativeHostConfig {
    /// Creates a host config from its identifier and executable.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument to the host command line.
    #[inline]
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments to the host command line.
    #[inline]
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the reverse-DNS host identifier.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the host executable path.
    #[inline]
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns the host command-line arguments.
    #[inline]
    #[must_use]
    pub fn command_args(&self) -> &[String] {
        &self.args
    }

    /// Validates the configuration.
    ///
    /// The host name must be non-empty, contain only lowercase
    /// alphanumerics, dots and underscores, and must not start or end with
    /// a dot or contain consecutive dots. The executable path must be
    /// non-empty.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::config("native host name must not be empty"));
        }

        let valid_chars = self
            .name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '_');
        if !valid_chars {
            return Err(Error::config(format!(
                "native host name '{}' may only contain lowercase alphanumerics, dots and underscores",
                self.name
            )));
        }

        if self.name.starts_with('.') || self.name.ends_with('.') || self.name.contains("..") {
            return Err(Error::config(format!(
                "native host name '{}' has a misplaced dot",
                self.name
            )));
        }

        if self.program.as_os_str().is_empty() {
            return Err(Error::config("native host executable must not be empty"));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
