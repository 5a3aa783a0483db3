//! Utilities for resolving container image build-matrix tags.
//!
//! The library expands a declarative configuration into the full Cartesian
//! matrix of build targets, collapses alias tags onto canonical ones,
//! prunes excluded combinations, groups cross-target shared tags, and
//! selects the template and artifact directory for every canonical target.
//! All public APIs are documented with invariants, error semantics, and
//! minimal examples to facilitate integration in automation tooling.

mod aggregate;
mod artifact;
mod axis;
mod config;
mod error;
mod exclude;
mod fetch;
mod generate;
mod matrix;
mod resolver;
mod shared;
mod template;
mod version;

pub use aggregate::{TagMetadata, TagSet, aggregate};
pub use artifact::resolve_path;
pub use axis::{Axis, MatrixPoint, SubtagPattern, Subtags};
pub use config::{
    AliasTable, AxisValues, Defaults, DefaultsMap, MatrixConfig, SharedConfig, load_config,
    parse_config,
};
pub use error::{Error, io_error};
pub use exclude::is_excluded;
pub use fetch::fetch_latest_version;
pub use generate::{
    GeneratedTarget, METADATA_FILE_NAME, RECIPE_FILE_NAME, SHARED_TAGS_FILE_NAME, generate_targets,
};
pub use matrix::{AxisSets, PointIter};
pub use resolver::{TagInfo, compose_canonical, resolve};
pub use shared::{SharedTagGroups, shared_groups};
pub use template::{TemplateRule, TemplateRules};
pub use version::Version;
