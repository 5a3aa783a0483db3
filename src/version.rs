// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Dotted version strings for the SDK axis.
///
/// Provides truncation to a significance scale and the list of rounded
/// prefixes used as SDK axis values and alias sources.
use regex::Regex;
use serde::Serialize;

use crate::error::Error;

/// Validated dotted version, e.g. `8.2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Version {
    parts: Vec<String>
}

impl Version {
    /// Parses a dotted version string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](Error::Validation) when the input is not
    /// one or more dot-separated numeric components.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagmatrix::Version;
    ///
    /// let version = Version::parse("8.2.0").expect("valid version");
    /// assert_eq!(version.to_string(), "8.2.0");
    /// assert!(Version::parse("8.2-rc1").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, Error> {
        let pattern = Regex::new(r"^\d+(\.\d+)*$")
            .map_err(|e| Error::validation(format!("invalid regex: {e}")))?;

        let trimmed = input.trim();
        if !pattern.is_match(trimmed) {
            return Err(Error::validation(format!(
                "'{input}' is not a dotted numeric version"
            )));
        }

        Ok(Self {
            parts: trimmed.split('.').map(str::to_owned).collect()
        })
    }

    /// Returns the version truncated to `scale + 1` leading components.
    ///
    /// Scale 0 keeps the major version only; a scale beyond the available
    /// components returns the full version.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagmatrix::Version;
    ///
    /// let version = Version::parse("8.2.0").expect("valid version");
    /// assert_eq!(version.truncate(0), "8");
    /// assert_eq!(version.truncate(1), "8.2");
    /// assert_eq!(version.truncate(5), "8.2.0");
    /// ```
    pub fn truncate(&self, scale: usize) -> String {
        let keep = (scale + 1).min(self.parts.len());
        self.parts[..keep].join(".")
    }

    /// Returns every rounded prefix of the version, shortest first.
    ///
    /// For `8.2.0` this yields `["8", "8.2", "8.2.0"]`, the value set the
    /// SDK axis of a build matrix is typically populated with.
    pub fn rounded(&self) -> Vec<String> {
        (0..self.parts.len()).map(|scale| self.truncate(scale)).collect()
    }

    /// Number of dot-separated components.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always `false`: parsing guarantees at least one component.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.parts.join("."))
    }
}
