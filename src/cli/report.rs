//! Report printing over a finished scan session. Read-only consumer of
//! [`ScanState`].

use anyhow::Result;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::output::Output;
use crate::scanner::{ScanOptions, ScanState};

/// Human-readable report: the effective settings, every counter, then each
/// error-path set with its paths listed.
pub fn print_text(state: &ScanState, options: &ScanOptions, out: &Output) {
    out.header("Scan settings");
    out.key_value("Skip subdirectories:", &options.skip_sub_dirs.to_string());
    out.key_value("Skip hidden files:", &options.skip_hidden_files.to_string());
    out.key_value("Skip hidden directories:", &options.skip_hidden_dirs.to_string());
    out.key_value("Skip zero-length files:", &options.skip_zero_len.to_string());
    out.key_value("Include directory regexes:", &regex_list(&options.incl_dir_regexes));
    out.key_value("Exclude directory regexes:", &regex_list(&options.excl_dir_regexes));
    out.key_value("Include file regexes:", &regex_list(&options.incl_file_regexes));
    out.key_value("Exclude file regexes:", &regex_list(&options.excl_file_regexes));

    out.header("Scan results");
    out.summary_stat("Files checked", state.checked);
    out.summary_stat("Files accepted", state.accepted);
    out.summary_stat("Skipped links", state.skipped_links);
    out.summary_stat("Skipped zero-length files", state.skipped_zero_len);
    out.summary_stat("Skipped hidden files", state.skipped_hidden_files);
    out.summary_stat("Skipped hidden directories", state.skipped_hidden_dirs);
    out.summary_stat("Skipped directories (exclude regex)", state.skipped_exclude_dirs);
    out.summary_stat(
        "Skipped directories (outside include regex)",
        state.skipped_include_dirs,
    );
    out.summary_stat("Skipped files (exclude regex)", state.skipped_exclude_files);
    out.summary_stat(
        "Skipped files (outside include regex)",
        state.skipped_include_files,
    );

    out.header("Errors");
    out.summary_stat("Total errors", state.error_count);
    print_path_set(out, "File permission errors", &state.file_permission_errs);
    print_path_set(out, "Directory permission errors", &state.dir_permission_errs);
    print_path_set(out, "File not found errors", &state.file_not_found_errs);
    print_path_set(out, "Directory not found errors", &state.dir_not_found_errs);
    print_path_set(out, "Generic file errors", &state.file_generic_errs);
    print_path_set(out, "Generic directory errors", &state.dir_generic_errs);
}

/// Machine-readable report: the full session state as pretty JSON.
pub fn print_json(state: &ScanState) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}

fn print_path_set(out: &Output, label: &str, paths: &BTreeSet<PathBuf>) {
    out.summary_stat(label, paths.len() as u64);
    for path in paths {
        out.list_item(&path.display().to_string());
    }
}

fn regex_list(patterns: &[Regex]) -> String {
    if patterns.is_empty() {
        "(none)".to_string()
    } else {
        patterns
            .iter()
            .map(|re| re.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
