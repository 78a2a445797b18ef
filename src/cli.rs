//! CLI module - Command-line interface definitions and handlers

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use shardcache::core::model::{Meta, ResultError, ResultItem, ResultSet};
use shardcache::core::paths::make_relative;
use shardcache::core::render::{OutputFormat, RenderConfig, Renderer};
use shardcache::core::util::{parse_ttl, unix_to_rfc3339, KeyHasher};
use shardcache::{Cache, CacheOptions, EntryInfo};

/// shardcache - a filesystem-backed key/value cache with per-entry expiration.
#[derive(Parser, Debug)]
#[command(name = "shardcache")]
#[command(
    author,
    version,
    about,
    long_about = r#"shardcache stores byte values under string keys in a hash-sharded
directory tree (<ROOT>/cache/<b0>/<b1>/<b2>/<rest>.db), each with an optional TTL.

`get` and `remember` write the raw value to stdout. Every other command prints
result items in the selected format (default: jsonl).

Examples:
    shardcache put user:42 '{"name":"ada"}' --ttl 5m
    shardcache get user:42
    echo -n payload | shardcache put blob:1
    shardcache remember weather --ttl 10m -- curl -s https://example.com/weather
    shardcache sweep
"#
)]
pub struct Cli {
    /// Cache root directory.
    #[arg(
        long,
        global = true,
        env = "SHARDCACHE_ROOT",
        default_value = ".",
        value_name = "ROOT",
        long_help = "Cache root directory. Entries are stored under ROOT/cache.\n\n\
Directories are created lazily on the first write."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md).
    #[arg(long, global = true, default_value = "jsonl", value_name = "FORMAT")]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Key hash used for path derivation (md5/sha1).
    #[arg(
        long,
        global = true,
        default_value = "md5",
        value_parser = ["md5", "sha1"],
        value_name = "HASHER",
        long_help = "Key hash used for path derivation.\n\n\
All processes sharing a cache root must use the same hasher and extension,\n\
otherwise they will not see each other's entries."
    )]
    pub hasher: String,

    /// Entry file extension.
    #[arg(long, global = true, default_value = "db", value_name = "EXT")]
    pub ext: String,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the value stored under KEY.
    #[command(long_about = "Write the raw value stored under KEY to stdout.\n\n\
Exits non-zero if the key is absent or expired. Expired entries are removed.")]
    Get {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Store a value under KEY.
    #[command(long_about = "Store VALUE under KEY, replacing any existing entry.\n\n\
If VALUE is omitted, the value is read from stdin.\n\n\
Examples:\n\
  shardcache put greeting hello --ttl 30s\n\
  cat report.pdf | shardcache put report:2024 --ttl 1d\n")]
    Put {
        #[arg(value_name = "KEY")]
        key: String,

        /// Value to store (read from stdin if omitted).
        #[arg(value_name = "VALUE")]
        value: Option<String>,

        /// Time to live: seconds, or 30s / 5m / 2h / 1d. 0 means never expires.
        #[arg(long, default_value = "0", value_name = "TTL", value_parser = parse_ttl)]
        ttl: Duration,
    },

    /// Delete the entry under KEY.
    Delete {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Print the value under KEY, computing it with CMD on a miss.
    #[command(long_about = "Return the cached value for KEY. On a miss or expiry, run CMD,\n\
store its stdout under KEY with the given TTL and print it.\n\n\
A non-zero exit status of CMD is an error and nothing is stored.\n\n\
Example:\n\
  shardcache remember git:head --ttl 1m -- git rev-parse HEAD\n")]
    Remember {
        #[arg(value_name = "KEY")]
        key: String,

        /// Time to live: seconds, or 30s / 5m / 2h / 1d. 0 means never expires.
        #[arg(long, default_value = "0", value_name = "TTL", value_parser = parse_ttl)]
        ttl: Duration,

        /// Producer command and its arguments.
        #[arg(last = true, required = true, num_args = 1.., value_name = "CMD")]
        cmd: Vec<String>,
    },

    /// Show the storage path derived for KEY.
    Path {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Show the header of the entry under KEY without enforcing expiration.
    Inspect {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Remove all expired entries.
    Sweep,

    /// Count entries and bytes in the cache.
    Stats,

    /// Remove every entry.
    Clear,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().map_err(|e: String| anyhow!(e))?;
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let hasher: KeyHasher = cli.hasher.parse().map_err(|e: String| anyhow!(e))?;
    let options = CacheOptions::new()
        .with_hasher(hasher)
        .with_extension(cli.ext);
    let cache = Cache::with_options(cli.root, options);

    match cli.command {
        Commands::Get { key } => {
            let data = report(render_config, cache.get(key.as_bytes()))
                .with_context(|| format!("Failed to get {:?}", key))?;
            write_stdout(&data)
        }

        Commands::Put { key, value, ttl } => {
            let value = match value {
                Some(value) => value.into_bytes(),
                None => read_stdin()?,
            };
            report(render_config, cache.put(key.as_bytes(), &value, ttl))
                .with_context(|| format!("Failed to put {:?}", key))?;

            let info = report(render_config, cache.inspect(key.as_bytes()))?;
            emit(render_config, entry_item(cache.root(), &key, &info).with_status("stored"))
        }

        Commands::Delete { key } => {
            let path = cache.path_for(key.as_bytes());
            report(render_config, cache.delete(key.as_bytes()))
                .with_context(|| format!("Failed to delete {:?}", key))?;

            let item = ResultItem::entry(&key, relative(cache.root(), &path)).with_status("deleted");
            emit(render_config, item)
        }

        Commands::Remember { key, ttl, cmd } => {
            let data = report(
                render_config,
                cache.remember(key.as_bytes(), ttl, || run_producer(&cmd)),
            )
            .with_context(|| format!("Failed to remember {:?}", key))?;
            write_stdout(&data)
        }

        Commands::Path { key } => {
            let path = cache.path_for(key.as_bytes());
            emit(render_config, ResultItem::path(&key, relative(cache.root(), &path)))
        }

        Commands::Inspect { key } => {
            let info = report(render_config, cache.inspect(key.as_bytes()))
                .with_context(|| format!("Failed to inspect {:?}", key))?;
            emit(render_config, entry_item(cache.root(), &key, &info))
        }

        Commands::Sweep => {
            let swept = report(render_config, cache.sweep()).context("Failed to sweep cache")?;
            emit(
                render_config,
                ResultItem::report("swept", serde_json::to_value(swept)?),
            )
        }

        Commands::Stats => {
            let stats =
                report(render_config, cache.stats()).context("Failed to collect cache stats")?;
            emit(
                render_config,
                ResultItem::report("stats", serde_json::to_value(stats)?),
            )
        }

        Commands::Clear => {
            report(render_config, cache.clear()).context("Failed to clear cache")?;
            emit(
                render_config,
                ResultItem::report("cleared", serde_json::json!({ "path": "cache" })),
            )
        }
    }
}

/// Run the producer command and capture its stdout
fn run_producer(cmd: &[String]) -> Result<Vec<u8>> {
    let (program, args) = cmd.split_first().ok_or_else(|| anyhow!("empty command"))?;
    tracing::debug!(program = %program, "running producer");

    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to run {:?}", program))?;

    if !output.status.success() {
        bail!(
            "{:?} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(output.stdout)
}

fn entry_item(root: &Path, key: &str, info: &EntryInfo) -> ResultItem {
    let meta = Meta {
        size: Some(info.size),
        created_at: unix_to_rfc3339(info.created_at),
        expires_at: info.expires_at.and_then(unix_to_rfc3339),
        ttl_secs: Some(info.expiration.as_secs()),
        expired: info.expired,
    };
    ResultItem::entry(key, relative(root, &info.path)).with_meta(meta)
}

fn relative(root: &Path, path: &Path) -> String {
    make_relative(path, root).unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Print a failed cache operation as an error item, then hand the error back
fn report<T>(config: RenderConfig, result: shardcache::Result<T>) -> Result<T> {
    result.map_err(|err| {
        let item = ResultItem::error(ResultError::new(err.code(), err.to_string()));
        if let Err(e) = emit(config, item) {
            tracing::debug!(error = %e, "failed to print error item");
        }
        anyhow::Error::new(err)
    })
}

fn emit(config: RenderConfig, item: ResultItem) -> Result<()> {
    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&ResultSet::from(item)));
    Ok(())
}

fn write_stdout(data: &[u8]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(data).context("Failed to write to stdout")?;
    stdout.flush().context("Failed to flush stdout")
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .context("Failed to read value from stdin")?;
    Ok(buf)
}
