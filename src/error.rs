#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the tag pipeline."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free while still
//! exposing a thoroughly documented error surface for library consumers.

use std::path::{Path, PathBuf};

use crate::axis::Axis;

/// Unified error type returned by the matrix resolver and CLI.
///
/// Configuration errors are fatal and abort a run before any output is
/// written; lookup errors are reported per query and do not abort batch
/// operations. All resolution failures are deterministic functions of the
/// configuration, so every error is reproducible.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading configuration or template
    /// files.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// Location of the file being read.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps decoding errors for the configuration document.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when the configuration violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Returned when an axis of the build matrix has no values to expand.
    #[error("axis '{axis}' has an empty value set")]
    EmptyAxis {
        /// The axis whose value set was empty.
        axis: Axis
    },
    /// Returned when canonicalization needs a default the configuration
    /// does not provide.
    #[error("no default value configured for axis '{axis}'")]
    MissingDefault {
        /// The axis missing a default value.
        axis: Axis
    },
    /// Returned when a queried tag is neither canonical nor a known alias.
    #[error("tag '{tag}' is not produced by the build matrix")]
    UnknownTag {
        /// The tag that could not be resolved.
        tag: String
    },
    /// Returned when no template rule matches a canonical target. Fatal for
    /// that target's generation; a target cannot be skipped silently.
    #[error("no template rule matches tag '{tag}'")]
    NoTemplateMatch {
        /// The canonical tag without a template.
        tag: String
    },
    /// Wraps template engine failures while rendering a recipe.
    #[error("failed to render template '{template}': {message}")]
    Render {
        /// Path of the template being rendered.
        template: String,
        /// Human readable message from the template engine.
        message:  String
    },
    /// Wraps serialization errors when writing resolved output.
    #[error("failed to serialize output: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Service errors when interacting with external APIs.
    #[error("service error: {message}")]
    Service {
        /// Human readable message describing the service error.
        message: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a service error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the service error.
    pub fn service<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Service {
            message: message.into()
        }
    }

    /// Constructs an unknown-tag lookup error.
    ///
    /// # Parameters
    ///
    /// * `tag` - The tag that resolved to neither a canonical identifier nor
    ///   an alias.
    pub fn unknown_tag<T>(tag: T) -> Self
    where
        T: Into<String>
    {
        Self::UnknownTag {
            tag: tag.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<masterror::AppError> for Error {
    fn from(error: masterror::AppError) -> Self {
        Self::Service {
            message: error.to_string()
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use crate::axis::Axis;

    #[test]
    fn validation_constructor_populates_message() {
        let error = Error::validation("something went wrong");
        match error {
            Error::Validation {
                ref message
            } => {
                assert_eq!(message, "something went wrong");
            }
            other => panic!("expected validation error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::validation("display me");
        assert_eq!(error.to_string(), error.to_display_string());
    }

    #[test]
    fn missing_default_names_the_axis() {
        let error = Error::MissingDefault {
            axis: Axis::Python
        };
        assert_eq!(error.to_string(), "no default value configured for axis 'python'");
    }

    #[test]
    fn empty_axis_names_the_axis() {
        let error = Error::EmptyAxis {
            axis: Axis::Platform
        };
        assert!(error.to_string().contains("platform"));
    }

    #[test]
    fn unknown_tag_constructor_keeps_the_tag() {
        let error = Error::unknown_tag("8.2-slim");
        match error {
            Error::UnknownTag {
                ref tag
            } => {
                assert_eq!(tag, "8.2-slim");
            }
            other => panic!("expected unknown tag error, got {other:?}")
        }
    }

    #[test]
    fn io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/matrix.yaml");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::io_error(path, io_error);

        match error {
            Error::Io {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}")
        }
    }

    #[test]
    fn serde_yaml_conversion_maps_to_parse_variant() {
        let error = serde_yaml::from_str::<usize>("not-a-number").unwrap_err();
        let mapped: Error = error.into();
        assert!(matches!(mapped, Error::Parse { .. }));
    }

    #[test]
    fn serde_json_conversion_maps_to_serialize_variant() {
        let invalid = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let mapped: Error = invalid.into();
        assert!(matches!(mapped, Error::Serialize { .. }));
    }
}
