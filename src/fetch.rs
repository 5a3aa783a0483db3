// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Latest-release lookup against the GitHub releases API.
///
/// Resolution itself never performs I/O; the version fetched here is fed
/// back into the pipeline as the externally supplied primary version, the
/// same way a workflow would inject it into the configuration document.
use masterror::AppError;
use octocrab::Octocrab;
use tracing::debug;

use crate::version::Version;

/// Fetches the latest release version of `repo` (`owner/name` form).
///
/// Release tags may carry a leading `v`; the returned string is the bare
/// dotted version.
///
/// # Arguments
///
/// * `repo` - Upstream repository in `owner/name` form
/// * `token` - Optional GitHub token for authenticated requests
///
/// # Errors
///
/// Returns [`AppError`] when the repository reference is malformed, the
/// API request fails, or the release tag is not a dotted numeric version.
///
/// # Example
///
/// ```no_run
/// use tagmatrix::fetch_latest_version;
///
/// # async fn example() -> Result<(), masterror::AppError> {
/// let version = fetch_latest_version("dwavesystems/dwave-ocean-sdk", None).await?;
/// println!("latest release: {version}");
/// # Ok(())
/// # }
/// ```
pub async fn fetch_latest_version(repo: &str, token: Option<&str>) -> Result<String, AppError> {
    let (owner, name) = parse_repo(repo)?;

    let mut builder = Octocrab::builder();
    if let Some(token) = token {
        builder = builder.personal_token(token.to_owned());
    }
    let octocrab = builder
        .build()
        .map_err(|e| AppError::unauthorized(format!("failed to initialize GitHub client: {e}")))?;

    debug!("Fetching latest release of {owner}/{name}");
    let release = octocrab
        .repos(owner, name)
        .releases()
        .get_latest()
        .await
        .map_err(|e| AppError::service(format!("GitHub release lookup failed: {e}")))?;

    normalize_release_tag(&release.tag_name)
}

fn parse_repo(repo: &str) -> Result<(String, String), AppError> {
    let mut parts = repo.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Ok((owner.to_owned(), name.to_owned()))
        }
        _ => Err(AppError::validation(format!(
            "repository '{repo}' must use the owner/name form"
        )))
    }
}

fn normalize_release_tag(tag: &str) -> Result<String, AppError> {
    let bare = tag.trim().trim_start_matches('v');
    let version = Version::parse(bare)
        .map_err(|e| AppError::validation(format!("release tag '{tag}' is not a version: {e}")))?;
    Ok(version.to_string())
}
