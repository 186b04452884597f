use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use log::info;

use objinv::config::CliConfig;
use objinv::data_object::LineMode;
use objinv::inventory::{Inventory, Source, SourceType};
use objinv::suggest::Suggestion;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path (TOML, YAML, or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    AsIs,
    Expand,
    Contract,
}

impl From<ModeArg> for LineMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::AsIs => LineMode::AsIs,
            ModeArg::Expand => LineMode::Expand,
            ModeArg::Contract => LineMode::Contract,
        }
    }
}

#[derive(Parser)]
#[command(group(ArgGroup::new("src").args(["positional", "zlib", "plain", "url", "json"]).required(true)))]
struct SourceArgs {
    /// Inventory source, sniffed as zlib then plaintext then JSON
    positional: Option<PathBuf>,

    /// Read a zlib-compressed objects.inv
    #[arg(long)]
    zlib: Option<PathBuf>,

    /// Read a plaintext inventory
    #[arg(long)]
    plain: Option<PathBuf>,

    /// Fetch an inventory over HTTP(S)
    #[arg(long)]
    url: Option<String>,

    /// Read an inventory JSON dict
    #[arg(long)]
    json: Option<PathBuf>,
}

impl SourceArgs {
    fn load(&self) -> Result<Inventory> {
        if let Some(path) = &self.zlib {
            return Ok(Inventory::from_bytes_zlib(&objinv::fileops::readbytes(path)?)?);
        }
        if let Some(path) = &self.plain {
            return Ok(Inventory::from_bytes_plaintext(&objinv::fileops::readbytes(
                path,
            )?)?);
        }
        if let Some(url) = &self.url {
            return Ok(Inventory::from_url(url)?);
        }
        if let Some(path) = &self.json {
            let value: serde_json::Value =
                serde_json::from_slice(&objinv::fileops::readbytes(path)?)?;
            return Ok(Inventory::from_dict_json(&value, true)?);
        }
        match &self.positional {
            Some(path) => load_by_sniffing(path),
            None => bail!("no inventory source given"),
        }
    }
}

/// Probe a bare positional path as zlib, then plaintext, then JSON.
fn load_by_sniffing(path: &PathBuf) -> Result<Inventory> {
    let bytes = objinv::fileops::readbytes(path)?;
    if let Ok(inv) = Inventory::from_source(Source::Bytes(&bytes)) {
        return Ok(inv);
    }
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    Ok(Inventory::from_dict_json(&value, true)?)
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an inventory between zlib, plaintext, and JSON forms
    Convert {
        #[command(flatten)]
        source: SourceArgs,

        /// Output path
        output: PathBuf,

        /// Emit zlib-compressed plaintext
        #[arg(long, conflicts_with_all = ["to_json"])]
        to_zlib: bool,

        /// Emit uncompressed plaintext
        #[arg(long, conflicts_with_all = ["to_json"])]
        to_plaintext: bool,

        /// Emit the JSON dict form
        #[arg(long)]
        to_json: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Render record lines expanded, contracted, or as stored
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Fuzzy-search an inventory's object references
    Suggest {
        #[command(flatten)]
        source: SourceArgs,

        /// Search query
        query: String,

        /// Include the match's original index
        #[arg(long)]
        with_index: bool,

        /// Include the match score
        #[arg(long)]
        with_score: bool,

        /// Minimum score to keep a match
        #[arg(long)]
        threshold: Option<f64>,

        /// Cap the number of results shown
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print project, version, count, and source type for an inventory
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn source_type_label(source_type: SourceType) -> &'static str {
    match source_type {
        SourceType::Manual => "manual",
        SourceType::BytesPlaintext => "bytes (plaintext)",
        SourceType::BytesZlib => "bytes (zlib)",
        SourceType::FnamePlaintext => "file (plaintext)",
        SourceType::FnameZlib => "file (zlib)",
        SourceType::DictJSON => "json",
        SourceType::Url => "url",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    std::env::set_var("RUST_LOG", log_level);
    env_logger::init();

    let config = match &cli.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    match cli.command {
        Commands::Convert {
            source,
            output,
            to_zlib,
            to_plaintext,
            to_json,
            pretty,
            mode,
        } => {
            let inventory = source.load()?;
            let mode: LineMode = mode.map(Into::into).unwrap_or(config.default_mode.into());

            if to_json {
                let dict = inventory.json_dict(mode);
                let text = if pretty {
                    serde_json::to_string_pretty(&dict)?
                } else {
                    serde_json::to_string(&dict)?
                };
                objinv::fileops::writebytes(&output, text.as_bytes())?;
            } else {
                let text = inventory.data_file(mode)?;
                if to_zlib {
                    let compressed = objinv::codec::compress(text.as_bytes())?;
                    objinv::fileops::writebytes(&output, &compressed)?;
                } else if to_plaintext {
                    objinv::fileops::writebytes(&output, text.as_bytes())?;
                } else {
                    bail!("one of --to-zlib, --to-plaintext, or --to-json is required");
                }
            }

            info!(
                "wrote {} objects to {}",
                inventory.count(),
                output.display()
            );
        }

        Commands::Suggest {
            source,
            query,
            with_index,
            with_score,
            threshold,
            limit,
        } => {
            let inventory = source.load()?;
            let threshold = threshold.unwrap_or(config.suggest_threshold);
            let mut results =
                inventory.suggest_with_threshold(&query, with_index, with_score, threshold);
            if let Some(limit) = limit {
                results.truncate(limit);
            }
            for result in &results {
                print_suggestion(result);
            }
        }

        Commands::Inspect { source } => {
            let inventory = source.load()?;
            println!(
                "project:      {}",
                inventory.project.as_deref().unwrap_or("(none)")
            );
            println!(
                "version:      {}",
                inventory.version.as_deref().unwrap_or("(none)")
            );
            println!("count:        {}", inventory.count());
            println!("source type:  {}", source_type_label(inventory.source_type));
        }
    }

    Ok(())
}

fn print_suggestion(suggestion: &Suggestion) {
    match suggestion {
        Suggestion::RefOnly(r) => println!("{r}"),
        Suggestion::RefIndex(r, idx) => println!("{r}  [{idx}]"),
        Suggestion::RefScore(r, score) => println!("{r}  ({score:.1})"),
        Suggestion::RefScoreIndex(r, score, idx) => println!("{r}  ({score:.1})  [{idx}]"),
    }
}
