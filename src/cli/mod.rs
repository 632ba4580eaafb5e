//! Command-line interface for scour
//!
//! A thin driver over the scan engine: argument parsing, directory/file
//! classification, checkpoint printing, and the final report.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

mod output;
mod report;

pub use output::Output;

use crate::scanner::options::{self, ScanOptions};
use crate::scanner::{ScanState, Scanner};

/// Scan directories and files, applying skip filters and permission checks,
/// then report what was accepted, skipped, and failed
#[derive(Parser)]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Directories and/or files to scan; directories recurse unless
    /// --skip-sub-dirs is set
    #[arg(value_name = "PATH", required = true)]
    pub items: Vec<PathBuf>,

    /// Do not recurse into subdirectories
    #[arg(long)]
    pub skip_sub_dirs: bool,

    /// Skip files whose name starts with a dot
    #[arg(long)]
    pub skip_hidden_files: bool,

    /// Skip directories whose name starts with a dot
    #[arg(long)]
    pub skip_hidden_dirs: bool,

    /// Keep zero-length files (skipped by default)
    #[arg(long)]
    pub keep_zero_len: bool,

    /// Only scan files whose directory matches at least one regex
    #[arg(long, value_name = "REGEX", value_delimiter = ',')]
    pub include_dir_regex: Vec<String>,

    /// Skip files and subtrees whose directory matches any regex
    #[arg(long, value_name = "REGEX", value_delimiter = ',')]
    pub exclude_dir_regex: Vec<String>,

    /// Only scan files whose name matches at least one regex
    #[arg(long, value_name = "REGEX", value_delimiter = ',')]
    pub include_file_regex: Vec<String>,

    /// Skip files whose name matches any regex
    #[arg(long, value_name = "REGEX", value_delimiter = ',')]
    pub exclude_file_regex: Vec<String>,

    /// Print a progress line every N checked files
    #[arg(long, default_value = "10", value_name = "N")]
    pub report_frequency: u64,

    /// Root used to derive relative paths for loose files
    #[arg(long, default_value = "/", value_name = "DIR")]
    pub root: PathBuf,

    /// Report format
    #[arg(long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Suppress progress and informational output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output (debug-level traces on stderr)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text report
    Text,
    /// JSON dump of the full session state
    Json,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        let out = Output::new(self.quiet || matches!(self.format, ReportFormat::Json));
        let scanner = Scanner::new(self.build_options()?)?;
        let mut state = ScanState::new();

        // A filesystem probe decides the bucket: directories walk
        // recursively, everything else is a loose file.
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for item in &self.items {
            if item.is_dir() {
                dirs.push(item.clone());
            } else {
                if !item.exists() {
                    out.warning(&format!("Path not found: {}", item.display()));
                }
                // Still handed to the engine, which counts the failure.
                files.push(item.clone());
            }
        }

        out.info(&format!(
            "Scanning {} directories and {} loose files",
            dirs.len(),
            files.len()
        ));

        for checked in scanner.scan_directories(&dirs, &mut state) {
            out.progress(&format!("Scanned {checked} files"));
        }
        for checked in scanner.scan_files(&files, &self.root, &mut state) {
            out.progress(&format!("Scanned {checked} files (loose files)"));
        }

        match self.format {
            ReportFormat::Text => report::print_text(&state, scanner.options(), &out),
            ReportFormat::Json => report::print_json(&state)?,
        }

        Ok(())
    }

    fn build_options(&self) -> Result<ScanOptions> {
        Ok(ScanOptions {
            skip_sub_dirs: self.skip_sub_dirs,
            skip_hidden_files: self.skip_hidden_files,
            skip_hidden_dirs: self.skip_hidden_dirs,
            skip_zero_len: !self.keep_zero_len,
            incl_dir_regexes: options::compile_patterns(&self.include_dir_regex)?,
            excl_dir_regexes: options::compile_patterns(&self.exclude_dir_regex)?,
            incl_file_regexes: options::compile_patterns(&self.include_file_regex)?,
            excl_file_regexes: options::compile_patterns(&self.exclude_file_regex)?,
            report_frequency: self.report_frequency,
            ..ScanOptions::default()
        })
    }
}
