//! # logscope
//!
//! A CLI tool for analyzing web server access logs.
//!
//! ## Overview
//!
//! logscope is built on top of logscopelib and prints, for every log file it
//! is given, a summary of bot and human traffic, error responses, visited
//! pages, referring domains and client platforms.
//!
//! ## Usage
//!
//! ```bash
//! # Analyze a single log
//! logscope /var/log/nginx/access.log
//!
//! # Analyze every log in a directory, skipping old rotations
//! logscope /var/log/nginx --exclude "**/*.log.[5-9]"
//!
//! # Output as JSON
//! logscope access.log --output json
//!
//! # Accept longer lines and show debug logging
//! logscope access.log --max-line-length 4096 -v
//! ```

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use logscopelib::{analyze_paths, AnalyzeOptions, FilterConfig, MAX_LINE_LENGTH};
use render::OutputMode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("logscope")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Access log analyzer: bots, visitors, errors and traffic")
        .arg(
            Arg::new("paths")
                .help("Log files or directories to analyze")
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("include")
                .short('i')
                .long("include")
                .action(ArgAction::Append)
                .help("Include files matching glob pattern (directories only)"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude files matching glob pattern (directories only)"),
        )
        .arg(
            Arg::new("max-line-length")
                .long("max-line-length")
                .value_parser(value_parser!(usize))
                .help(format!(
                    "Reject a file containing a line longer than this [default: {}]",
                    MAX_LINE_LENGTH
                )),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "text", "term", "json"])
                .default_value("table")
                .help("Output format (table styles only when writing to a terminal)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Show debug logging on stderr"),
        )
}

/// Build a FilterConfig from include/exclude args
fn build_filter(matches: &ArgMatches) -> anyhow::Result<FilterConfig> {
    let mut filter = FilterConfig::new();

    if let Some(includes) = matches.get_many::<String>("include") {
        for pattern in includes {
            filter = filter.include(pattern)?;
        }
    }

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for pattern in excludes {
            filter = filter.exclude(pattern)?;
        }
    }

    Ok(filter)
}

/// Install the stderr log subscriber. `RUST_LOG` wins unless `-v` is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Analyze the inputs and print the results. Returns whether any file was
/// analyzed.
fn run(matches: &ArgMatches) -> anyhow::Result<bool> {
    let paths: Vec<PathBuf> = matches
        .get_many::<PathBuf>("paths")
        .context("no input paths given")?
        .cloned()
        .collect();
    let max_line_length = matches
        .get_one::<usize>("max-line-length")
        .copied()
        .unwrap_or(MAX_LINE_LENGTH);

    let options = AnalyzeOptions::new()
        .max_line_length(max_line_length)
        .filter(build_filter(matches)?);

    debug!(inputs = paths.len(), max_line_length, "starting analysis");
    let result = analyze_paths(&paths, &options);

    for line in render::render_failures(&result) {
        eprintln!("{}", line);
    }

    let analyzed = result.files.len() - result.failed_count();
    info!(
        files = result.files.len(),
        analyzed,
        failed = result.failed_count(),
        "processed files"
    );
    if analyzed == 0 {
        return Ok(false);
    }

    let rendered = render::render_result(&result, output_mode(matches))
        .map_err(|e| anyhow::anyhow!("failed to render results: {e}"))?;
    println!("{}", rendered.trim_end());

    Ok(true)
}

/// Map the --output value to an outstanding OutputMode
fn output_mode(matches: &ArgMatches) -> OutputMode {
    matches
        .get_one::<String>("output")
        .map(|s| match s.as_str() {
            "json" => OutputMode::Json,
            "text" => OutputMode::Text,
            "term" => OutputMode::Term,
            _ => OutputMode::Auto,
        })
        .unwrap_or(OutputMode::Auto)
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("Error: no log file could be analyzed");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_build_filter() {
        let matches = build_command().get_matches_from([
            "logscope",
            "logs",
            "--include",
            "**/*.txt",
            "-e",
            "**/old/**",
        ]);
        let filter = build_filter(&matches).unwrap();

        assert_eq!(filter.include.len(), 1);
        assert_eq!(filter.exclude.len(), 1);
    }

    #[test]
    fn test_build_filter_invalid_glob() {
        let matches =
            build_command().get_matches_from(["logscope", "logs", "--include", "[invalid"]);

        assert!(build_filter(&matches).is_err());
    }

    #[test]
    fn test_output_mode() {
        let matches = build_command().get_matches_from(["logscope", "access.log"]);
        assert!(matches!(output_mode(&matches), OutputMode::Auto));

        let matches =
            build_command().get_matches_from(["logscope", "access.log", "--output", "json"]);
        assert!(matches!(output_mode(&matches), OutputMode::Json));

        let matches =
            build_command().get_matches_from(["logscope", "access.log", "-o", "text"]);
        assert!(matches!(output_mode(&matches), OutputMode::Text));
    }

    #[test]
    fn test_max_line_length_arg() {
        let matches = build_command().get_matches_from(["logscope", "access.log"]);
        assert_eq!(matches.get_one::<usize>("max-line-length"), None);

        let matches = build_command().get_matches_from([
            "logscope",
            "access.log",
            "--max-line-length",
            "4096",
        ]);
        assert_eq!(matches.get_one::<usize>("max-line-length"), Some(&4096));
    }
}
