//! fastzone CLI - Command-line tool for Call of Duty FastFiles.
//!
//! This is the main entry point for the fastzone command-line application.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use fastzone::prelude::*;

/// fastzone - Call of Duty FastFile decompression and asset extraction tool
#[derive(Parser)]
#[command(name = "fastzone")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file with decompression options and scan limits
    #[arg(long, env = "FASTZONE_LIMITS", global = true)]
    limits: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the container header and zone summary
    Info {
        /// Path to the FastFile
        #[arg(short, long, env = "FASTZONE_INPUT")]
        input: PathBuf,
    },

    /// Decompress a FastFile to a raw zone buffer
    Decompress {
        /// Path to the FastFile
        #[arg(short, long, env = "FASTZONE_INPUT")]
        input: PathBuf,

        /// Output zone file (defaults to the input with a .zone extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compress a zone buffer into a FastFile
    Repack {
        /// Path to the zone file
        #[arg(short, long)]
        input: PathBuf,

        /// Output FastFile
        #[arg(short, long)]
        output: PathBuf,

        /// Target game
        #[arg(short, long, value_enum)]
        game: GameArg,

        /// Target platform
        #[arg(short, long, value_enum)]
        platform: PlatformArg,
    },

    /// List the declared asset pool
    List {
        /// Path to the FastFile
        #[arg(short, long, env = "FASTZONE_INPUT")]
        input: PathBuf,

        /// Regex over asset and type names (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,

        /// Include entries that were not decoded
        #[arg(short, long)]
        all: bool,
    },

    /// Extract rawfiles, string tables and localized strings
    Extract {
        /// Path to the FastFile
        #[arg(short, long, env = "FASTZONE_INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "OUTPUT_FOLDER")]
        output: PathBuf,

        /// Regex over asset names (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Dump the pool records and decode report as JSON
    Report {
        /// Path to the FastFile
        #[arg(short, long, env = "FASTZONE_INPUT")]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GameArg {
    Cod4,
    Waw,
    Mw2,
}

impl From<GameArg> for Game {
    fn from(arg: GameArg) -> Self {
        match arg {
            GameArg::Cod4 => Game::CoD4,
            GameArg::Waw => Game::WaW,
            GameArg::Mw2 => Game::MW2,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    Ps3,
    Xbox360,
    Pc,
    Wii,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Ps3 => Platform::Ps3,
            PlatformArg::Xbox360 => Platform::Xbox360,
            PlatformArg::Pc => Platform::Pc,
            PlatformArg::Wii => Platform::Wii,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let opts = load_options(cli.limits.as_deref())?;

    match cli.command {
        Commands::Info { input } => cmd_info(&input, &opts)?,
        Commands::Decompress { input, output } => cmd_decompress(&input, output, &opts)?,
        Commands::Repack {
            input,
            output,
            game,
            platform,
        } => cmd_repack(&input, &output, game.into(), platform.into())?,
        Commands::List { input, filter, all } => cmd_list(&input, filter.as_deref(), all, &opts)?,
        Commands::Extract {
            input,
            output,
            filter,
        } => cmd_extract(&input, &output, filter.as_deref(), &opts)?,
        Commands::Report { input, output } => cmd_report(&input, output.as_deref(), &opts)?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "fastzone=info",
        1 => "fastzone=debug",
        _ => "fastzone=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(path: Option<&Path>) -> Result<Options> {
    let Some(path) = path else {
        return Ok(Options::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read limits file {}", path.display()))?;
    let opts: Options = serde_json::from_str(&text)
        .with_context(|| format!("Invalid limits file {}", path.display()))?;
    debug!(path = %path.display(), ?opts, "loaded options");
    Ok(opts)
}

fn open(input: &Path, opts: &Options) -> Result<DecodedZone> {
    let start = Instant::now();
    let decoded = fastzone::open_with(input, opts)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    println!(
        "Decoded {} ({} {}) in {:?}: {} of {} assets",
        input.display(),
        decoded.header.game,
        decoded.header.platform,
        start.elapsed(),
        decoded.walk.count(RecordState::Decoded),
        decoded.walk.records.len()
    );
    Ok(decoded)
}

fn cmd_info(input: &Path, opts: &Options) -> Result<()> {
    let ff = FastFile::open(input).context("Failed to open FastFile")?;
    let header = ff.header();

    println!("File:       {}", ff.name());
    println!("Size:       {} bytes", header.file_len);
    println!("Game:       {}", header.game);
    println!("Platform:   {} ({:?})", header.platform, header.endian);
    println!("Version:    {:#x}", header.version);
    println!("Signed:     {}", header.is_signed());
    if let Some(ext) = ff.extended_header() {
        println!(
            "Extended:   online update {}, region {}, {} entries",
            ext.allow_online_update,
            ext.region,
            ext.entries.len()
        );
    }
    let plan: Vec<_> = fastzone::ff::plan(header).iter().map(|s| s.to_string()).collect();
    println!("Strategies: {}", plan.join(", "));

    let out = ff.decompress_with(&opts.decompress).context("Failed to decompress")?;
    println!(
        "Zone:       {} bytes via {} ({} blocks, {} failed)",
        out.zone.len(),
        out.report.strategy,
        out.report.blocks_ok,
        out.report.blocks_failed
    );

    let Ok(def) = GameDefinition::lookup(header.game, header.platform) else {
        println!("No zone definition for {} {}", header.game, header.platform);
        return Ok(());
    };
    let zone = Zone::with_limits(out.zone, def, opts.limits.clone()).context("Failed to parse zone")?;
    println!("Strings:    {}", zone.script_strings().len());
    println!("Assets:     {}", zone.pool().len());

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &zone.pool().records {
        *by_type.entry(record.type_name.as_str()).or_default() += 1;
    }
    for (type_name, count) in by_type {
        println!("  {:>20} {}", type_name, count);
    }

    Ok(())
}

fn cmd_decompress(input: &Path, output: Option<PathBuf>, opts: &Options) -> Result<()> {
    let ff = FastFile::open(input).context("Failed to open FastFile")?;
    let start = Instant::now();
    let out = ff.decompress_with(&opts.decompress).context("Failed to decompress")?;

    let output = output.unwrap_or_else(|| input.with_extension("zone"));
    fs::write(&output, &out.zone).context("Failed to write zone file")?;

    println!(
        "Wrote {} bytes to {} via {} in {:?}",
        out.zone.len(),
        output.display(),
        out.report.strategy,
        start.elapsed()
    );
    Ok(())
}

fn cmd_repack(input: &Path, output: &Path, game: Game, platform: Platform) -> Result<()> {
    let zone = fs::read(input).context("Failed to read zone file")?;
    let packed = fastzone::ff::repack(&zone, game, platform)
        .with_context(|| format!("Failed to repack for {game} {platform}"))?;
    fs::write(output, &packed).context("Failed to write FastFile")?;

    println!(
        "Packed {} bytes into {} ({} bytes)",
        zone.len(),
        output.display(),
        packed.len()
    );
    Ok(())
}

fn cmd_list(input: &Path, filter: Option<&str>, all: bool, opts: &Options) -> Result<()> {
    let decoded = open(input, opts)?;
    let filter = filter.map(build_filter).transpose()?;

    let mut count = 0;
    for record in &decoded.walk.records {
        if !all && record.state != RecordState::Decoded {
            continue;
        }
        let name = record.name.as_deref().unwrap_or("");
        if let Some(re) = &filter {
            if !re.is_match(name) && !re.is_match(&record.type_name) {
                continue;
            }
        }

        let range = record
            .range
            .as_ref()
            .map(|r| format!("{:#010x}..{:#010x}", r.start, r.end))
            .unwrap_or_default();
        println!(
            "{:>5} {:>16} {:<11} {:<24} {}{} {}",
            record.index,
            record.type_name,
            format!("{:?}", record.state),
            range,
            if record.recovered { "*" } else { "" },
            name,
            record.summary.as_deref().unwrap_or("")
        );
        count += 1;
    }

    println!("\nTotal: {} entries ({:?} mode)", count, decoded.walk.mode);
    Ok(())
}

/// One file to write during extraction.
struct Job<'a> {
    path: PathBuf,
    contents: Vec<u8>,
    name: &'a str,
}

fn cmd_extract(input: &Path, output: &Path, filter: Option<&str>, opts: &Options) -> Result<()> {
    let decoded = open(input, opts)?;
    let filter = filter.map(build_filter).transpose()?;
    let keep = |name: &str| filter.as_ref().map_or(true, |re| re.is_match(name));
    let (jobs, localize) = collect_jobs(&decoded.walk.assets, decoded.zone.data(), output, keep);

    if jobs.is_empty() && localize.is_empty() {
        bail!("Nothing to extract");
    }

    fs::create_dir_all(output)?;
    if !localize.is_empty() {
        fs::write(output.join("localize.txt"), &localize).context("Failed to write localize.txt")?;
    }

    println!("Extracting {} files...", jobs.len());
    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let errors: Vec<String> = jobs
        .par_iter()
        .filter_map(|job| {
            let result = job
                .path
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|()| fs::write(&job.path, &job.contents));
            pb.inc(1);
            result.err().map(|e| format!("{}: {}", job.name, e))
        })
        .collect();

    pb.finish_with_message("Done");
    for error in &errors {
        eprintln!("Error writing {}", error);
    }
    println!(
        "Extracted {} files in {:?} ({} errors)",
        jobs.len() - errors.len(),
        start.elapsed(),
        errors.len()
    );

    Ok(())
}

/// Files to write plus the localize listing, for assets passing `keep`.
fn collect_jobs<'a>(
    assets: &'a [Asset],
    data: &[u8],
    output: &Path,
    keep: impl Fn(&str) -> bool,
) -> (Vec<Job<'a>>, String) {
    let mut jobs = Vec::new();
    let mut localize = String::new();

    for asset in assets {
        if !keep(asset.name()) {
            continue;
        }
        match asset {
            Asset::RawFile(raw) => match raw.contents(data) {
                Some(contents) => jobs.push(Job {
                    path: safe_join(output, &raw.name),
                    contents: contents.to_vec(),
                    name: &raw.name,
                }),
                None => warn!(name = %raw.name, "skipping compressed rawfile cut off by the end of the zone"),
            },
            Asset::StringTable(table) => jobs.push(Job {
                path: safe_join(output, &table.name),
                contents: table.to_csv().into_bytes(),
                name: &table.name,
            }),
            Asset::Localize(entry) => {
                localize.push_str(&entry.key);
                localize.push('\t');
                localize.push_str(entry.value.as_deref().unwrap_or(""));
                localize.push('\n');
            }
            _ => {}
        }
    }

    (jobs, localize)
}

fn cmd_report(input: &Path, output: Option<&Path>, opts: &Options) -> Result<()> {
    let decoded = fastzone::open_with(input, opts)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    let report = serde_json::json!({
        "file": input.display().to_string(),
        "header": decoded.header,
        "decompress": decoded.report,
        "zone_header": decoded.zone.header(),
        "script_strings": decoded.zone.script_strings().len(),
        "mode": decoded.walk.mode,
        "switched_at": decoded.walk.switched_at,
        "anchor": decoded.walk.anchor,
        "records": decoded.walk.records,
    });

    let text = serde_json::to_string_pretty(&report)?;
    match output {
        Some(path) => fs::write(path, text).context("Failed to write report")?,
        None => println!("{text}"),
    }
    Ok(())
}

fn build_filter(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .with_context(|| format!("Invalid filter pattern {pattern:?}"))
}

/// Join an asset path under `root`, dropping anything that would escape it.
fn safe_join(root: &Path, name: &str) -> PathBuf {
    let relative: PathBuf = Path::new(&name.replace('\\', "/"))
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    root.join(relative)
}
