use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use snb2md::batch::{self, BatchOptions};
use snb2md::{ConversionReport, ConvertOptions, LinkStyle};

/// Convert Samsung S Note `.snb` files to Markdown.
#[derive(Parser)]
#[command(name = "snb2md", version, about)]
struct Cli {
    /// Note to convert, or the start directory with --recursive (default: .)
    input: Option<PathBuf>,

    /// Output Markdown file (default: <input name>.md in the current directory)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Directory to extract images to. With --recursive, a subdirectory
    /// created next to each exported note instead.
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    image_dir: Option<PathBuf>,

    /// Write images as [[WikiLinks]] (e.g. for Obsidian)
    #[arg(short, long)]
    wikilink: bool,

    /// Convert every .snb file below INPUT into --export-root
    #[arg(short, long, conflicts_with = "output")]
    recursive: bool,

    /// Output root for --recursive
    #[arg(long, value_name = "DIR", default_value = "exported")]
    export_root: PathBuf,

    /// Keep page background images
    #[arg(long)]
    include_backgrounds: bool,
}

impl Cli {
    fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            link_style: if self.wikilink {
                LinkStyle::WikiLink
            } else {
                LinkStyle::Markdown
            },
            include_backgrounds: self.include_backgrounds,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if cli.recursive {
        return run_recursive(&cli);
    }

    let Some(input) = cli.input.as_deref() else {
        Cli::command().print_help().ok();
        return ExitCode::FAILURE;
    };
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.md", snb2md::document_name(input))));
    let image_dir = cli.image_dir.clone().unwrap_or_else(|| {
        output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    match snb2md::convert_snb_to_markdown(input, &output, &image_dir, &cli.convert_options()) {
        Ok(report) => {
            print_summary(input, &output, &report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}: {e}", input.display());
            ExitCode::FAILURE
        }
    }
}

fn run_recursive(cli: &Cli) -> ExitCode {
    let start_dir = cli.input.clone().unwrap_or_else(|| PathBuf::from("."));
    let options = BatchOptions {
        export_root: cli.export_root.clone(),
        image_subdir: cli.image_dir.clone(),
        convert: cli.convert_options(),
    };

    let jobs = match batch::discover_jobs(&start_dir, &options) {
        Ok(jobs) => jobs,
        Err(e) => {
            eprintln!("Error: {}: {e}", start_dir.display());
            return ExitCode::FAILURE;
        }
    };

    let outcomes = batch::run_batch(&jobs, &options);
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => print_summary(&outcome.job.input, &outcome.job.output, report),
            Err(e) => {
                failed += 1;
                eprintln!("Error: {}: {e}", outcome.job.input.display());
            }
        }
    }
    println!("{}/{} notes converted", outcomes.len() - failed, outcomes.len());

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_summary(input: &Path, output: &Path, report: &ConversionReport) {
    println!(
        "{} -> {} ({} images)",
        input.display(),
        output.display(),
        report.images.len()
    );
    for warning in &report.warnings {
        eprintln!("  warning: {warning}");
    }
}
