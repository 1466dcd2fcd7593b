use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};

use txt2mdx::builder::{ConverterConfig, convert_file};
use txt2mdx::reading::{IPADIC_READING_FIELD, ReadingSource};
use txt2mdx::utils::ProgressState;

/// Converts a headword/meaning text source into an MDict index and a
/// redirect table.
#[derive(Parser, Debug)]
#[command(name = "txt2mdx", version, about)]
struct Args {
    /// Source text: headword lines each followed by a meaning line
    input: PathBuf,

    /// Output index table (headword<TAB>html)
    index_output: PathBuf,

    /// Output redirect table (key<TAB>headword)
    redirect_output: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Vibrato system dictionary for automatic readings (.dic or .dic.zst)
    #[arg(short, long, conflicts_with = "reading_table")]
    dictionary: Option<PathBuf>,

    /// Index of the reading in the dictionary's feature strings
    #[arg(long, default_value_t = IPADIC_READING_FIELD)]
    feature_index: usize,

    /// TSV table of text<TAB>reading lines for automatic readings
    #[arg(short = 't', long)]
    reading_table: Option<PathBuf>,

    /// Skip entries with an empty headword instead of stopping
    #[arg(long)]
    skip_malformed: bool,

    /// Stop on a kanji headword without automatic reading instead of
    /// writing it without one
    #[arg(long)]
    require_readings: bool,
}

fn report_progress(state: &mut ProgressState) -> bool {
    info!(
        "{}: {}/{} ({}%), source line {}, {} entries with issues",
        state.state_id,
        state.current + 1,
        state.total,
        state.percent(),
        state.line_no,
        state.issues
    );
    false
}

fn run(args: Args) -> txt2mdx::Result<()> {
    let mut config = match &args.config {
        Some(path) => ConverterConfig::from_file(path)?,
        None => ConverterConfig::default(),
    };
    if let Some(dictionary) = args.dictionary {
        config.reading = Some(ReadingSource::Dictionary {
            dictionary,
            feature_index: args.feature_index,
        });
    } else if let Some(table) = args.reading_table {
        config.reading = Some(ReadingSource::Table { table });
    }
    if args.skip_malformed {
        config.skip_malformed_headwords = true;
    }
    if args.require_readings {
        config.require_readings = true;
    }
    if config.reading.is_none() {
        info!("No reading source given (--dictionary or --reading-table), kanji headwords only get readings from {{...}}");
    }

    let summary = convert_file(
        &args.input,
        &args.index_output,
        &args.redirect_output,
        &config,
        Some(report_progress),
    )?;

    println!(
        "Conversion completed: {} entries, {} redirects written to {} and {}",
        summary.entries,
        summary.redirects,
        args.index_output.display(),
        args.redirect_output.display()
    );
    if summary.skipped > 0 || summary.unread > 0 || summary.markup_warnings > 0 {
        println!(
            "{} entries skipped, {} without reading, {} markup warnings (see log)",
            summary.skipped, summary.unread, summary.markup_warnings
        );
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("Conversion failed: {}", e);
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}
