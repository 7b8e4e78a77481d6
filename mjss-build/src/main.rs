mod discovery;
mod pipeline;
mod reports;
mod site;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use discovery::discover_set_files;
use pipeline::{ProcessedSet, run_batch};
use reports::SetSummary;
use site::{IndexPage, write_build_stamp, write_standings};

#[derive(Debug, Parser)]
#[command(name = "mjss-build", version)]
#[command(about = "Validate recorded score sheets and build per-day standings pages")]
struct Args {
    /// Root directory holding gb/pws/<group>/<sheet>.json
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory the standings pages and index are written to
    #[arg(long, default_value = "build")]
    build_dir: PathBuf,

    /// List discovered score sheets and exit
    #[arg(long)]
    list: bool,

    /// Skip writing the timestamped build stamp
    #[arg(long)]
    no_stamp: bool,

    /// Run summary format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the run summary instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let files = discover_set_files(&args.data_dir)?;
    if args.list {
        return list_sheets(&args, &files);
    }

    if args.report == "console" && args.output.is_none() {
        announce_banner();
    }

    let start_time = Instant::now();
    let processed = run_batch(&args.data_dir, &files)?;
    let summaries = write_site(&args, &processed)?;
    write_reports(&args, &summaries, start_time)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner() {
    println!("{}", "🀄 Score Sheet Standings Builder".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn list_sheets(args: &Args, files: &[PathBuf]) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Discovered score sheets:")?;
    for file in files {
        writeln!(output_target.writer(), "  {}", file.display())?;
    }
    output_target.flush_inner()?;
    Ok(())
}

fn write_site(args: &Args, processed: &[ProcessedSet]) -> Result<Vec<SetSummary>> {
    let mut index = IndexPage::new(args.build_dir.join("index.html"));
    let mut summaries = Vec::with_capacity(processed.len());

    for set in processed {
        let page = write_standings(&args.build_dir, set)?;
        index.add(page.clone());
        summaries.push(SetSummary::new(set, page));
    }

    if !args.no_stamp {
        let stamp = write_build_stamp(&args.build_dir, &Local::now())?;
        index.add(stamp);
    }

    index.write()?;
    log::info!(
        "wrote {} pages to {}",
        index.pages().len(),
        display_dir(&args.build_dir)
    );
    Ok(summaries)
}

fn display_dir(dir: &Path) -> String {
    dir.canonicalize()
        .unwrap_or_else(|_| dir.to_path_buf())
        .display()
        .to_string()
}

fn write_reports(args: &Args, summaries: &[SetSummary], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            if summaries.is_empty() {
                writeln!(&mut output_target, "[]")?;
            } else {
                reports::generate_json_report(&mut output_target, summaries)?;
            }
        }
        "markdown" => {
            if summaries.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Standings Build Results\n\n_No score sheets found._"
                )?;
            } else {
                reports::generate_markdown_report(&mut output_target, summaries)?;
            }
        }
        _ => {
            if summaries.is_empty() {
                writeln!(&mut output_target, "No score sheets found.")?;
            } else {
                reports::generate_console_report(
                    &mut output_target,
                    summaries,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
