//! Command-line interface for the tagmatrix binary.
//!
//! The CLI exposes subcommands for previewing the tags a build matrix
//! produces, querying per-tag metadata, paths, and templates, generating
//! per-target recipes, and resolving the latest upstream release version.

use std::{io, path::PathBuf, process};

use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use tagmatrix::{
    AxisSets, Error, MatrixConfig, TagSet, Version, aggregate, fetch_latest_version,
    generate_targets, load_config, resolve_path, shared_groups,
};
use tracing_subscriber::EnvFilter;

/// Command line interface for resolving build-matrix tags.
#[derive(Debug, Parser,)]
#[command(name = "tagmatrix", version, about = "Resolve container image build-matrix tags")]
/// Top-level CLI options parsed from user input.
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Preview all tags the matrix produces, mapped to canonical tags.
    Tags(TagsArgs,),
    /// Look up metadata for a canonical or alias tag.
    Metadata(MetadataArgs,),
    /// Print shared tag groups spanning several canonical targets.
    Shared(SharedArgs,),
    /// Resolve the artifact directory for a tag.
    Path(PathArgs,),
    /// Resolve the render template for a tag.
    Template(TemplateArgs,),
    /// Render recipes and metadata for every canonical target.
    Generate(GenerateArgs,),
    /// Fetch the latest upstream release version.
    Latest(LatestArgs,),
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `tags` subcommand.
struct TagsArgs
{
    /// Path to the matrix configuration document.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// Emit alias bags as JSON instead of the text preview.
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct MetadataArgs
{
    /// Path to the matrix configuration document.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// Tag to look up, canonical or alias.
    #[arg(long = "tag", value_name = "TAG")]
    tag: String,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct SharedArgs
{
    /// Path to the matrix configuration document.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct PathArgs
{
    /// Path to the matrix configuration document.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// Tag to resolve, canonical or alias.
    #[arg(long = "tag", value_name = "TAG")]
    tag: String,

    /// SDK version truncation scale; 0 keeps the major version only.
    #[arg(long = "scale", value_name = "N", default_value_t = 1)]
    scale: usize,
}

#[derive(Debug, Args,)]
struct TemplateArgs
{
    /// Path to the matrix configuration document.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// Canonical or alias tag to select a template for.
    #[arg(long = "tag", value_name = "TAG")]
    tag: String,
}

#[derive(Debug, Args,)]
struct GenerateArgs
{
    /// Path to the matrix configuration document.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// Directory receiving the generated targets.
    #[arg(long = "output", value_name = "DIR", default_value = "dockerfiles")]
    output: PathBuf,

    /// SDK version truncation scale for target directories.
    #[arg(long = "scale", value_name = "N", default_value_t = 1)]
    scale: usize,
}

#[derive(Debug, Args,)]
struct LatestArgs
{
    /// Upstream repository in owner/name form; falls back to the
    /// configuration's upstream_repo.
    #[arg(long = "repo", value_name = "OWNER/NAME")]
    repo: Option<String,>,

    /// Path to the matrix configuration document.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// GitHub token for authenticated requests.
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String,>,

    /// Print every rounded prefix of the version, shortest first, one per
    /// line.
    #[arg(long = "rounded", action = ArgAction::SetTrue)]
    rounded: bool,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env(),)
        .with_writer(io::stderr,)
        .init();

    if let Err(error,) = run() {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates errors originating from configuration loading and matrix
/// resolution.
fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();

    match cli.command {
        Command::Tags(args,) => run_tags(args,),
        Command::Metadata(args,) => run_metadata(args,),
        Command::Shared(args,) => run_shared(args,),
        Command::Path(args,) => run_path(args,),
        Command::Template(args,) => run_template(args,),
        Command::Generate(args,) => run_generate(args,),
        Command::Latest(args,) => run_latest(args,),
    }
}

fn resolve_tag_set(config: &MatrixConfig,) -> Result<TagSet, Error,>
{
    let sets = AxisSets::from_values(&config.matrix,);
    aggregate(&sets, &config.defaults, &config.aliases, &config.exclude, &config.default_tag,)
}

fn run_tags(args: TagsArgs,) -> Result<(), Error,>
{
    let config = load_config(&args.config,)?;
    let tags = resolve_tag_set(&config,)?;

    if args.json {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_json(&mut handle, tags.bags(), args.pretty,)
    } else {
        print!("{}", render_preview(&config, &tags,));
        Ok((),)
    }
}

/// Renders the text preview listing the matrix, canonical tags with alias
/// bags, and the sorted set of all tags.
fn render_preview(config: &MatrixConfig, tags: &TagSet,) -> String
{
    use std::fmt::Write as _;

    let mut out = String::new();

    out.push_str("===\nmatrix\n===\n",);
    for axis in tagmatrix::Axis::ALL {
        let _ = writeln!(out, "- {axis}: {}", config.matrix.get(axis,).join(", "),);
    }

    let _ = write!(out, "\n===\ncanonical tags: {}\n===\n", tags.len(),);
    for canonical in tags.canonical_tags() {
        let aliases = tags.aliases_of(canonical,).unwrap_or_default();
        let _ = write!(out, "{canonical}:\n  {}\n\n", aliases.join(", "),);
    }

    let all_tags = tags.all_tags();
    let _ = write!(out, "===\nall tags: {}\n===\n", all_tags.len(),);
    for tag in &all_tags {
        let _ = writeln!(out, "{tag}",);
    }

    out
}

fn write_json<W: io::Write, T: Serialize,>(
    writer: &mut W,
    value: &T,
    pretty: bool,
) -> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, value,)?;
    } else {
        serde_json::to_writer(writer, value,)?;
    }

    Ok((),)
}

fn run_metadata(args: MetadataArgs,) -> Result<(), Error,>
{
    let config = load_config(&args.config,)?;
    let tags = resolve_tag_set(&config,)?;
    let metadata = tags.metadata(&args.tag,)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, &metadata, args.pretty,)
}

fn run_shared(args: SharedArgs,) -> Result<(), Error,>
{
    let config = load_config(&args.config,)?;
    let sets = config
        .shared
        .matrix
        .as_ref()
        .map_or_else(|| AxisSets::from_values(&config.matrix,), AxisSets::from_values,);
    let groups = shared_groups(
        &config.shared.contracted,
        &config.defaults,
        &sets,
        &config.aliases,
        &config.exclude,
        &config.default_tag,
    )?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, &groups, args.pretty,)
}

fn run_path(args: PathArgs,) -> Result<(), Error,>
{
    let config = load_config(&args.config,)?;
    let tags = resolve_tag_set(&config,)?;
    let path = resolve_path(&args.tag, &tags, args.scale,)?;
    println!("{}", path.display());
    Ok((),)
}

fn run_template(args: TemplateArgs,) -> Result<(), Error,>
{
    let config = load_config(&args.config,)?;
    let tags = resolve_tag_set(&config,)?;

    let canonical = tags.resolve_canonical(&args.tag,)?;
    let subtags =
        tags.canonical_subtags(canonical,).ok_or_else(|| Error::unknown_tag(&args.tag,),)?;
    let template = config.template.select_required(canonical, subtags,)?;
    println!("{template}");
    Ok((),)
}

fn run_generate(args: GenerateArgs,) -> Result<(), Error,>
{
    let config = load_config(&args.config,)?;
    let targets = generate_targets(&config, &args.output, args.scale,)?;
    println!("generated {} targets under {}", targets.len(), args.output.display());
    Ok((),)
}

fn run_latest(args: LatestArgs,) -> Result<(), Error,>
{
    let repo = match (args.repo, args.config,) {
        (Some(repo,), _,) => repo,
        (None, Some(config_path,),) => {
            let config = load_config(&config_path,)?;
            config.upstream_repo.ok_or_else(|| {
                Error::validation("configuration does not define upstream_repo",)
            },)?
        }
        (None, None,) => {
            return Err(Error::validation(
                "either --repo or --config with upstream_repo is required",
            ),);
        }
    };

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|source| Error::service(format!("failed to start async runtime: {source}"),),)?;
    let version = runtime.block_on(fetch_latest_version(&repo, args.token.as_deref(),),)?;
    print!("{}", render_versions(&version, args.rounded,)?);
    Ok((),)
}

/// Formats the fetched version, optionally as the list of rounded prefixes
/// a workflow substitutes into the configuration document.
fn render_versions(version: &str, rounded: bool,) -> Result<String, Error,>
{
    if !rounded {
        return Ok(format!("{version}\n"),);
    }

    let parsed = Version::parse(version,)?;
    let mut out = String::new();
    for prefix in parsed.rounded() {
        out.push_str(&prefix,);
        out.push('\n',);
    }
    Ok(out,)
}
