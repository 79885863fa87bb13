//! lyricsync CLI: align lyrics to ASR word timings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use lyricsync_core::cache::{alignment_key, cache_dir, get_cached_alignment, store_alignment_cache};
use lyricsync_core::{
    group_into_lines, load_transcript, AlignConfig, AlignmentEntry, AlignmentResult, LyricsAligner,
    Status,
};

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "lyricsync",
    about = "Align lyrics to speech-recognition word timings",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Time every lyric word against an ASR transcript
    Align(AlignArgs),
    /// Group an alignment into timed display lines
    Lines(LinesArgs),
}

// ─── Align ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct AlignArgs {
    /// Lyrics text file (UTF-8, one lyric line per line)
    #[arg(long)]
    lyrics: PathBuf,

    /// ASR transcript JSON with word-level timestamps
    #[arg(long)]
    transcript: PathBuf,

    /// Output JSON path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Max ASR tokens per lyric token
    #[arg(short = 'k', long = "max-group")]
    max_group: Option<usize>,

    /// Cost of discarding an ASR token
    #[arg(long)]
    skip_asr_penalty: Option<f64>,

    /// Cost of leaving a lyric token unmatched
    #[arg(long)]
    skip_lyric_penalty: Option<f64>,

    /// Duration (s) of interpolated words before the first / after the last match
    #[arg(long)]
    fallback_duration: Option<f64>,

    /// Write the full result (entries, total cost, diagnostics) instead of the entry list
    #[arg(long, default_value_t = false)]
    full: bool,

    /// Disable the alignment result cache
    #[arg(long, default_value_t = false)]
    no_cache: bool,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

// ─── Lines ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct LinesArgs {
    /// Alignment JSON produced by `lyricsync align`
    input: PathBuf,

    /// Output JSON path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    // Init logging
    let log_level = match &cli.command {
        Command::Align(a) if a.verbose => "debug",
        Command::Lines(a) if a.verbose => "debug",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Align(args) => run_align(args),
        Command::Lines(args) => run_lines(args),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Merge the optional config file with command-line overrides.
fn build_config(args: &AlignArgs) -> Result<AlignConfig> {
    let mut config = match &args.config {
        Some(path) => AlignConfig::load(path)?,
        None => AlignConfig::default(),
    };
    if let Some(k) = args.max_group {
        config.max_group = k;
    }
    if let Some(p) = args.skip_asr_penalty {
        config.skip_asr_penalty = p;
    }
    if let Some(p) = args.skip_lyric_penalty {
        config.skip_lyric_penalty = p;
    }
    if let Some(d) = args.fallback_duration {
        config.fallback_duration = d;
    }
    config.validate()?;
    Ok(config)
}

/// Write pretty JSON to `path`, or stdout when no path is given.
fn write_json<T: serde::Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(p) => {
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(p, json)
                .with_context(|| format!("Failed to write output: {}", p.display()))?;
            log::info!("Wrote {}", p.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn summarize(result: &AlignmentResult) {
    if result.status() == Status::Warning {
        let names: Vec<String> = result.diagnostics.iter().map(|d| d.to_string()).collect();
        log::info!("Finished with diagnostics: {}", names.join(", "));
    }
    log::info!(
        "Timed {} lyric tokens: {} matched, {} interpolated",
        result.entries.len(),
        result.matched_count(),
        result.interpolated_count()
    );
    if let Some(cost) = result.total_cost {
        log::info!("Total alignment cost: {:.4}", cost);
    }
}

// ─── Align runner ────────────────────────────────────────────────

fn run_align(args: AlignArgs) -> Result<()> {
    let config = build_config(&args)?;

    let lyrics = std::fs::read_to_string(&args.lyrics)
        .with_context(|| format!("Failed to read lyrics: {}", args.lyrics.display()))?;
    let asr = load_transcript(&args.transcript)?;
    log::info!(
        "Loaded {} ASR words from {}",
        asr.len(),
        args.transcript.display()
    );

    let key = if args.no_cache {
        None
    } else {
        Some(alignment_key(&lyrics, &asr, &config)?)
    };
    let cached = key
        .as_deref()
        .and_then(|k| get_cached_alignment(&cache_dir(), k));

    let result = match cached {
        Some(result) => result,
        None => {
            let aligner = LyricsAligner::new(config)?;
            let result = aligner.align(&asr, &lyrics)?;
            if let Some(k) = key.as_deref() {
                if let Err(e) = store_alignment_cache(&cache_dir(), k, &result) {
                    log::warn!("Could not cache alignment: {:#}", e);
                }
            }
            result
        }
    };

    summarize(&result);

    if args.full {
        write_json(&result, args.output.as_deref())
    } else {
        write_json(&result.entries, args.output.as_deref())
    }
}

// ─── Lines runner ────────────────────────────────────────────────

/// Read either a bare entry list or a full result.
fn load_entries(path: &Path) -> Result<Vec<AlignmentEntry>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read alignment: {}", path.display()))?;
    if let Ok(entries) = serde_json::from_str::<Vec<AlignmentEntry>>(&data) {
        return Ok(entries);
    }
    let result: AlignmentResult = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse alignment: {}", path.display()))?;
    Ok(result.entries)
}

fn run_lines(args: LinesArgs) -> Result<()> {
    let entries = load_entries(&args.input)?;
    let lines = group_into_lines(&entries);
    log::info!("Grouped {} words into {} lines", entries.len(), lines.len());
    write_json(&lines, args.output.as_deref())
}
