// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Recipe and metadata generation for resolved build targets.
///
/// Writes one rendered recipe and one metadata document per canonical
/// target plus a top-level shared-tags summary. The whole matrix is
/// resolved and every template selected before the first file is written,
/// so a failing run never leaves a partial target set behind.
use std::{
    fs,
    path::{Path, PathBuf}
};

use handlebars::Handlebars;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    aggregate::{TagSet, aggregate},
    artifact::resolve_path,
    axis::Subtags,
    config::MatrixConfig,
    error::{self, Error},
    matrix::AxisSets,
    shared::{SharedTagGroups, shared_groups}
};

/// File name of the rendered recipe inside a target directory.
pub const RECIPE_FILE_NAME: &str = "Dockerfile";
/// File name of the per-target metadata document.
pub const METADATA_FILE_NAME: &str = "metadata.json";
/// File name of the top-level shared tag summary.
pub const SHARED_TAGS_FILE_NAME: &str = "shared-tags.json";

/// One generated target and the files written for it.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedTarget {
    /// Canonical tag of the target.
    pub canonical_tag: String,
    /// Template path that was rendered.
    pub template:      String,
    /// Rendered recipe location.
    pub recipe_path:   PathBuf,
    /// Metadata document location.
    pub metadata_path: PathBuf
}

/// Render context handed to the recipe template.
#[derive(Debug, Serialize)]
struct RecipeContext {
    canonical_tag: String,
    alias_tags:    Vec<String>,
    subtags:       Subtags,
    python_tag:    String,
    directory:     String
}

struct TargetPlan {
    canonical: String,
    template:  String,
    directory: PathBuf
}

/// Resolves the full matrix and writes all per-target artifacts.
///
/// # Arguments
///
/// * `config` - Fully expanded matrix configuration
/// * `output_dir` - Directory receiving target directories and the shared
///   summary
/// * `version_scale` - SDK version truncation scale for target directories
///
/// # Errors
///
/// Returns an [`Error`] when resolution fails, when a canonical target has
/// no matching template rule, when a template cannot be read or rendered,
/// or when writing an artifact fails. Resolution and template selection
/// errors surface before any file is written.
pub fn generate_targets(
    config: &MatrixConfig,
    output_dir: &Path,
    version_scale: usize
) -> Result<Vec<GeneratedTarget>, Error> {
    let sets = AxisSets::from_values(&config.matrix);
    let tags = aggregate(&sets, &config.defaults, &config.aliases, &config.exclude, &config.default_tag)?;

    let shared_sets = config.shared.matrix.as_ref().map_or_else(|| sets.clone(), AxisSets::from_values);
    let shared = shared_groups(
        &config.shared.contracted,
        &config.defaults,
        &shared_sets,
        &config.aliases,
        &config.exclude,
        &config.default_tag
    )?;

    let plans = plan_targets(config, &tags, version_scale)?;
    let registry = build_registry(&plans)?;

    info!("Generating {} build targets into {}", plans.len(), output_dir.display());
    let pb = ProgressBar::new(plans.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:24.yellow} {pos}/{len} {msg}")
            .expect("valid template")
    );

    let targets: Vec<GeneratedTarget> = plans
        .par_iter()
        .map(|plan| {
            let target = write_target(plan, &tags, &registry, output_dir);
            pb.inc(1);
            target
        })
        .collect::<Result<_, Error>>()?;

    write_shared_summary(&shared, output_dir)?;
    pb.finish_with_message(format!("{} targets generated", targets.len()));

    Ok(targets)
}

/// Selects a template and a directory for every canonical target.
///
/// A missing template rule fails the whole run here, before any side
/// effect: skipping the target silently would produce an incomplete set.
fn plan_targets(
    config: &MatrixConfig,
    tags: &TagSet,
    version_scale: usize
) -> Result<Vec<TargetPlan>, Error> {
    let mut plans = Vec::with_capacity(tags.len());
    for canonical in tags.canonical_tags() {
        let subtags = tags
            .canonical_subtags(canonical)
            .ok_or_else(|| Error::unknown_tag(canonical))?;
        let template = config.template.select_required(canonical, subtags)?;
        let directory = resolve_path(canonical, tags, version_scale)?;

        plans.push(TargetPlan {
            canonical: canonical.to_owned(),
            template:  template.to_owned(),
            directory
        });
    }
    Ok(plans)
}

fn build_registry(plans: &[TargetPlan]) -> Result<Handlebars<'static>, Error> {
    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);

    let mut registered = std::collections::BTreeSet::new();
    for plan in plans {
        if !registered.insert(plan.template.as_str()) {
            continue;
        }
        debug!("Registering template {}", plan.template);
        registry
            .register_template_file(&plan.template, &plan.template)
            .map_err(|e| Error::Render {
                template: plan.template.clone(),
                message:  e.to_string()
            })?;
    }

    Ok(registry)
}

fn write_target(
    plan: &TargetPlan,
    tags: &TagSet,
    registry: &Handlebars<'_>,
    output_dir: &Path
) -> Result<GeneratedTarget, Error> {
    let metadata = tags.metadata(&plan.canonical)?;
    let context = RecipeContext {
        canonical_tag: metadata.canonical_tag.clone(),
        alias_tags:    metadata.alias_tags.clone(),
        python_tag:    crate::axis::Axis::Python.format_value(&metadata.subtags.python),
        directory:     plan.directory.display().to_string(),
        subtags:       metadata.subtags.clone()
    };

    let rendered = registry.render(&plan.template, &context).map_err(|e| Error::Render {
        template: plan.template.clone(),
        message:  e.to_string()
    })?;

    let directory = output_dir.join(&plan.directory);
    fs::create_dir_all(&directory).map_err(|e| error::io_error(&directory, e))?;

    let recipe_path = directory.join(RECIPE_FILE_NAME);
    debug!("Writing recipe for {} to {}", plan.canonical, recipe_path.display());
    fs::write(&recipe_path, rendered).map_err(|e| error::io_error(&recipe_path, e))?;

    let metadata_path = directory.join(METADATA_FILE_NAME);
    let document = serde_json::to_string_pretty(&metadata)?;
    fs::write(&metadata_path, document).map_err(|e| error::io_error(&metadata_path, e))?;

    Ok(GeneratedTarget {
        canonical_tag: plan.canonical.clone(),
        template: plan.template.clone(),
        recipe_path,
        metadata_path
    })
}

fn write_shared_summary(shared: &SharedTagGroups, output_dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(output_dir).map_err(|e| error::io_error(output_dir, e))?;
    let path = output_dir.join(SHARED_TAGS_FILE_NAME);
    info!("Writing shared tag summary to {}", path.display());
    let document = serde_json::to_string_pretty(shared)?;
    fs::write(&path, document).map_err(|e| error::io_error(&path, e))
}
