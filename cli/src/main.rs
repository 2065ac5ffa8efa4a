//! tcopy - Tree Copy
//!
//! Recursive file/directory copy command powered by treecopy.

use clap::{ArgAction, Parser, ValueEnum};
use globset::{Glob, GlobSet, GlobSetBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use treecopy::{
    CopyOptions, DirExistsAction, Error as TreecopyError, SymlinkAction, permission,
};

/// tcopy - Recursive tree copy
///
/// Copy a file, directory tree, symlink, or named pipe to exactly DEST.
/// Existing directories at DEST are merged into by default.
///
/// Usage:
///   tcopy SOURCE DEST
#[derive(Parser, Debug)]
#[command(name = "tcopy", version, about, long_about = None)]
struct Args {
    /// Source file, directory, symlink, or named pipe
    source: PathBuf,

    /// Path the copy is created at
    dest: PathBuf,

    /// Profile-driven defaults
    #[arg(long, value_enum, default_value = "plain")]
    profile: ProfileName,

    /// Preserve access and modification times
    #[arg(short = 'p', long, conflicts_with = "no_times")]
    preserve_times: bool,

    /// Do not preserve times, even if the profile does
    #[arg(long)]
    no_times: bool,

    /// Preserve owner and group (usually requires root)
    #[arg(long, conflicts_with = "no_owner")]
    preserve_owner: bool,

    /// Do not preserve owner and group, even if the profile does
    #[arg(long)]
    no_owner: bool,

    /// Sync every file to disk before closing it
    #[arg(long, conflicts_with = "no_sync")]
    sync: bool,

    /// Do not sync files, even if the profile does
    #[arg(long)]
    no_sync: bool,

    /// Follow symlinks and copy what they point to
    #[arg(short = 'L', long, conflicts_with = "skip_symlinks")]
    dereference: bool,

    /// Leave symlinks out of the copy
    #[arg(long)]
    skip_symlinks: bool,

    /// What to do with directories that already exist below DEST
    #[arg(long, value_enum)]
    on_dir_exists: Option<DirExistsMode>,

    /// Skip entries whose file name matches the glob PATTERN
    ///
    /// Supports `*`, `?`, `[...]`, and `{a,b}`. May be given multiple times.
    #[arg(long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Add permission bits (octal) to every copied file and directory
    #[arg(long, value_name = "OCTAL", value_parser = parse_octal, conflicts_with = "no_perms")]
    chmod_add: Option<u32>,

    /// Do not copy permission bits; keep whatever creation produced
    #[arg(long)]
    no_perms: bool,

    /// Copy device files and sockets by reading their content
    #[arg(long)]
    specials: bool,

    /// Copy buffer size in bytes (0 = platform default)
    #[arg(long, value_name = "BYTES", default_value = "0")]
    buffer_size: usize,

    /// Maximum recursion depth (default: unlimited)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Show directory and per-file progress bars
    #[arg(long)]
    progress: bool,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short = 'v', long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only print errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileName {
    /// Content and permissions only
    Plain,
    /// Also times and ownership
    Archive,
    /// Archive, plus fsync of every file
    Durable,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirExistsMode {
    /// Copy into the existing directory (default)
    Merge,
    /// Remove the existing directory first
    Replace,
    /// Leave the existing directory and skip its subtree
    Keep,
}

impl From<DirExistsMode> for DirExistsAction {
    fn from(mode: DirExistsMode) -> Self {
        match mode {
            DirExistsMode::Merge => DirExistsAction::Merge,
            DirExistsMode::Replace => DirExistsAction::Replace,
            DirExistsMode::Keep => DirExistsAction::Untouchable,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ProfileDefaults {
    preserve_times: bool,
    preserve_owner: bool,
    sync: bool,
}

fn profile_defaults(profile: ProfileName) -> ProfileDefaults {
    match profile {
        ProfileName::Plain => ProfileDefaults {
            preserve_times: false,
            preserve_owner: false,
            sync: false,
        },
        ProfileName::Archive => ProfileDefaults {
            preserve_times: true,
            preserve_owner: true,
            sync: false,
        },
        ProfileName::Durable => ProfileDefaults {
            preserve_times: true,
            preserve_owner: true,
            sync: true,
        },
    }
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Destination {dest} is inside source directory {source_dir}")]
    DestinationInsideSource { source_dir: PathBuf, dest: PathBuf },

    #[error("Source {source_path} and destination {dest} are the same file")]
    SameFile { source_path: PathBuf, dest: PathBuf },

    #[error(transparent)]
    Copy(#[from] TreecopyError),
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. }
            | Self::DestinationInsideSource { .. }
            | Self::SameFile { .. } => "invalid_input",
            Self::Copy(source) => source.category().as_str(),
        }
    }

    fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidPattern { .. }
            | Self::DestinationInsideSource { .. }
            | Self::SameFile { .. } => 2,
            Self::Copy(_) => 1,
        }
    }

    /// Extra advice printed after the error line.
    fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Copy(source) if source.is_no_space() => Some(
                "the destination filesystem is full; free some space and run the copy again",
            ),
            _ => None,
        }
    }
}

/// Compile every `--exclude` pattern into one set matched against file names.
fn build_excludes(patterns: &[String]) -> CliResult<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| CliError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|source| CliError::InvalidPattern {
            pattern: patterns.join(" "),
            source,
        })
}

fn parse_octal(value: &str) -> std::result::Result<u32, String> {
    let digits = value.strip_prefix("0o").unwrap_or(value);
    let bits = u32::from_str_radix(digits, 8)
        .map_err(|e| format!("'{value}' is not an octal mode: {e}"))?;
    if bits > 0o7777 {
        return Err(format!("'{value}' has bits outside 7777"));
    }
    Ok(bits)
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    if let Err(error) = run(&args) {
        eprintln!("error[{}]: {}", error.code(), error);
        if let Some(hint) = error.hint() {
            eprintln!("hint: {hint}");
        }
        std::process::exit(error.exit_code());
    }
}

fn run(args: &Args) -> CliResult<()> {
    check_not_same_file(&args.source, &args.dest)?;
    check_destination_outside_source(&args.source, &args.dest)?;
    let options = build_options(args)?;

    tracing::debug!(?options, "effective options");

    // Progress bars replace the spinner when requested
    let spinner = if !args.quiet && !args.progress {
        let pb = ProgressBar::new_spinner();
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .ok()
            .map(|style| {
                pb.set_style(style);
                pb.enable_steady_tick(Duration::from_millis(100));
                pb.set_message(format!("Copying {}...", args.source.display()));
                pb
            })
    } else {
        None
    };

    let start = Instant::now();
    let result = treecopy::copy(&args.source, &args.dest, &options);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    result?;
    tracing::info!(
        "copied {} -> {} in {:?}",
        args.source.display(),
        args.dest.display(),
        start.elapsed()
    );
    Ok(())
}

fn build_options(args: &Args) -> CliResult<CopyOptions> {
    let defaults = profile_defaults(args.profile);

    let mut options = CopyOptions::default().with_copy_buffer_size(args.buffer_size);

    if (defaults.preserve_times || args.preserve_times) && !args.no_times {
        options = options.with_preserve_times();
    }
    if (defaults.preserve_owner || args.preserve_owner) && !args.no_owner {
        options = options.with_preserve_owner();
    }
    if (defaults.sync || args.sync) && !args.no_sync {
        options = options.with_sync();
    }

    if args.dereference {
        options = options.with_symlink_action(SymlinkAction::Deep);
    } else if args.skip_symlinks {
        options = options.with_symlink_action(SymlinkAction::Skip);
    }

    if let Some(mode) = args.on_dir_exists {
        options = options.with_dir_exists_action(mode.into());
    }

    if let Some(excludes) = build_excludes(&args.exclude)? {
        options = options.with_skip(move |_entry, src, _dst| {
            Ok(src.file_name().is_some_and(|name| excludes.is_match(name)))
        });
    }

    if let Some(bits) = args.chmod_add {
        options = options.with_permission_control(permission::add_permission(bits));
    } else if args.no_perms {
        options = options.with_permission_control(permission::leave_permissions());
    }

    if args.specials {
        options = options.with_specials();
    }
    if let Some(depth) = args.max_depth {
        options = options.with_max_depth(depth);
    }
    if args.progress {
        options = options.with_dir_progress().with_file_progress();
    }

    Ok(options)
}

/// Refuse to copy anything onto itself.
fn check_not_same_file(source: &Path, dest: &Path) -> CliResult<()> {
    let (Ok(source_resolved), Ok(dest_resolved)) = (source.canonicalize(), dest.canonicalize())
    else {
        return Ok(());
    };
    if source_resolved == dest_resolved {
        return Err(CliError::SameFile {
            source_path: source.to_path_buf(),
            dest: dest.to_path_buf(),
        });
    }
    Ok(())
}

/// Refuse to copy a directory into its own subtree.
fn check_destination_outside_source(source: &Path, dest: &Path) -> CliResult<()> {
    let is_dir = source
        .symlink_metadata()
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Ok(());
    }

    // Unresolvable paths are left for the copy itself to report
    let (Ok(source_dir), Ok(dest_resolved)) = (source.canonicalize(), resolve_partial(dest))
    else {
        return Ok(());
    };

    if dest_resolved.starts_with(&source_dir) {
        return Err(CliError::DestinationInsideSource {
            source_dir,
            dest: dest.to_path_buf(),
        });
    }
    Ok(())
}

/// Canonicalize the longest existing ancestor of `path` and re-append the rest.
fn resolve_partial(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path;
    let mut missing: Vec<OsString> = Vec::new();

    loop {
        match existing.canonicalize() {
            Ok(mut resolved) => {
                for name in missing.iter().rev() {
                    resolved.push(name);
                }
                return Ok(resolved);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
                    return Err(e);
                };
                missing.push(name.to_os_string());
                existing = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
            }
            Err(e) => return Err(e),
        }
    }
}
