use crate::utils::Result;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| env!("CARGO_PKG_VERSION").to_string());

#[derive(Parser)]
#[command(name="dsbgraph",
          version=&**FULL_VERSION,
          about="Characterization of double-strand break repair outcomes from amplicon sequencing",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Classify aligned reads and build the windowed variant table")]
    Process(ProcessArgs),
    #[clap(about = "Build the variation-distance graph from windowed variant tables")]
    Graph(GraphArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("process")))]
#[command(arg_required_else_help(true))]
pub struct ProcessArgs {
    #[clap(required = true)]
    #[clap(short = 'r')]
    #[clap(long = "reference")]
    #[clap(help = "FASTA file with the amplicon reference sequence")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub reference_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'b')]
    #[clap(long = "bams")]
    #[clap(help = "BAM files with aligned reads, one per repeat library")]
    #[clap(value_name = "BAMS")]
    #[clap(num_args = 1..)]
    #[arg(value_parser = check_file_exists)]
    pub bam_paths: Vec<PathBuf>,

    #[clap(required = true)]
    #[clap(short = 'd')]
    #[clap(long = "dsb-pos")]
    #[clap(help = "1-based position of the base immediately upstream of the double-strand break")]
    #[clap(value_name = "DSB_POS")]
    pub dsb_pos: usize,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for output files")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: String,

    #[clap(long = "window-size")]
    #[clap(value_name = "WINDOW_SIZE")]
    #[clap(help = "Number of reference bases kept on each side of the break")]
    #[clap(default_value = "10")]
    pub window_size: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "anchor-size")]
    #[clap(value_name = "ANCHOR_SIZE")]
    #[clap(help = "Number of reference bases checked on each side of the window")]
    #[clap(default_value = "20")]
    pub anchor_size: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "anchor-substitutions")]
    #[clap(value_name = "MAX_SUBST")]
    #[clap(help = "Maximum substitutions allowed per anchor (negative disables the check)")]
    #[clap(default_value = "1")]
    #[clap(allow_hyphen_values = true)]
    pub anchor_substitutions: i64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "anchor-indels")]
    #[clap(value_name = "MAX_INDEL")]
    #[clap(help = "Maximum indel columns allowed per anchor (negative disables the check)")]
    #[clap(default_value = "0")]
    #[clap(allow_hyphen_values = true)]
    pub anchor_indels: i64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "expect-reverse")]
    #[clap(help = "Accept reverse-strand alignments instead of forward-strand ones")]
    pub expect_reverse: bool,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "min-length")]
    #[clap(value_name = "MIN_LENGTH")]
    #[clap(help = "Minimum read length (raised to reach the break if smaller)")]
    #[clap(default_value = "0")]
    pub min_length: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "no-realign")]
    #[clap(help = "Disable realignment of indels that do not touch the break")]
    pub no_realign: bool,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "max-substitutions")]
    #[clap(value_name = "MAX_SUBST")]
    #[clap(help = "Reject reads with more than this many substitutions")]
    #[clap(default_value = None)]
    pub max_substitutions: Option<usize>,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("graph")))]
#[command(arg_required_else_help(true))]
pub struct GraphArgs {
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(help = "Windowed variant table produced by the process command")]
    #[clap(value_name = "TABLE")]
    #[arg(value_parser = check_file_exists)]
    pub input_path: PathBuf,

    #[clap(long = "comparison")]
    #[clap(help = "Second windowed variant table for a two-group comparison graph")]
    #[clap(value_name = "TABLE")]
    #[arg(value_parser = check_file_exists)]
    pub comparison_path: Option<PathBuf>,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for output files")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: String,

    #[clap(long = "group")]
    #[clap(value_name = "GROUP")]
    #[clap(help = "Name of the experimental group (defaults to the table file name)")]
    #[clap(default_value = None)]
    pub group: Option<String>,

    #[clap(long = "comparison-group")]
    #[clap(value_name = "GROUP")]
    #[clap(help = "Name of the comparison group (defaults to the table file name)")]
    #[clap(default_value = None)]
    pub comparison_group: Option<String>,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "min-freq")]
    #[clap(value_name = "MIN_FREQ")]
    #[clap(help = "Drop variants whose best group frequency is below this threshold")]
    #[clap(default_value = "0.00001")]
    #[arg(value_parser = ensure_unit_float)]
    pub min_freq: f64,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_prefix_path(s: &str) -> Result<String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn ensure_unit_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The value must be between 0.0 and 1.0, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}
