//! Command-line front end over `RecordStore`.
//!
//! Every command prints its result on stdout (record JSON or a link);
//! logs go to stderr.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::codec::{CodecError, ShareFormat};
use crate::config::{ConfigError, ShareConfig};
use crate::reconcile::{ImportError, MemoryLocation, RecordStore, UrlImport};

#[derive(Parser)]
#[command(
    name = "genreq",
    version,
    about = "Read and write shareable requisition links",
    long_about = "Decode requisition links (compact, legacy or password-encrypted),\n\
                  build new links from saved JSON files, and normalize pasted data."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Share settings (JSON, e.g. {"categoryInference": {...}}).
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode a link into a record.
    Decode(DecodeArgs),

    /// Build a link from a saved record file.
    Encode(EncodeArgs),

    /// Load a saved record file and print it normalized.
    ImportFile {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Read pasted data (JSON or "Key: Value" lines) from a file, `-` for stdin.
    ImportText {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

#[derive(Parser)]
pub struct DecodeArgs {
    #[arg(value_name = "URL")]
    pub url: String,

    /// Password for encrypted links.
    #[arg(long, env = "GENREQ_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Parser)]
pub struct EncodeArgs {
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    #[arg(long, value_enum, default_value = "compact")]
    pub format: FormatArg,

    /// Required with `--format encrypted`.
    #[arg(long, env = "GENREQ_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Page the link should open.
    #[arg(long, default_value = "https://localhost/")]
    pub base: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Compact,
    Legacy,
    Encrypted,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("this link is encrypted; pass --password or set GENREQ_PASSWORD")]
    PasswordRequired,
}

async fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    if path == Path::new("-") {
        use tokio::io::AsyncReadExt;
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        Ok(buf)
    } else {
        Ok(tokio::fs::read(path).await?)
    }
}

fn share_format(format: FormatArg, password: Option<String>) -> Result<ShareFormat, CliError> {
    Ok(match format {
        FormatArg::Compact => ShareFormat::Compact,
        FormatArg::Legacy => ShareFormat::Legacy,
        FormatArg::Encrypted => ShareFormat::Encrypted {
            password: password.ok_or(CliError::PasswordRequired)?,
        },
    })
}

/// Run one command; returns what should be printed on stdout.
pub async fn execute(cli: Cli) -> Result<String, CliError> {
    let config = match &cli.config {
        Some(path) => ShareConfig::load(path)?,
        None => ShareConfig::default(),
    };
    let mut store = RecordStore::new(config);

    match cli.command {
        Command::Decode(args) => {
            let mut location = MemoryLocation::new(args.url);
            match store.import_from_url(&mut location)? {
                UrlImport::Imported { warnings } => {
                    for warning in warnings {
                        tracing::warn!(%warning, "Link parameter skipped");
                    }
                }
                UrlImport::PasswordRequired => {
                    let password = args.password.ok_or(CliError::PasswordRequired)?;
                    store.decrypt_url_data_async(password, &mut location).await?;
                }
                UrlImport::NothingToImport => tracing::warn!("Link carries no patient data"),
            }
            Ok(store.export_json()?)
        }
        Command::Encode(args) => {
            let bytes = read_input(&args.path).await?;
            store.import_from_file(&bytes)?;
            let format = share_format(args.format, args.password)?;
            Ok(store.create_shareable_url(&MemoryLocation::new(args.base), &format)?)
        }
        Command::ImportFile { path } => {
            let bytes = read_input(&path).await?;
            store.import_from_file(&bytes)?;
            Ok(store.export_json()?)
        }
        Command::ImportText { path } => {
            let bytes = read_input(&path).await?;
            let text = String::from_utf8_lossy(&bytes);
            let format = store.import_from_pasted_text(&text)?;
            tracing::debug!(?format, "Pasted data imported");
            Ok(store.export_json()?)
        }
    }
}
