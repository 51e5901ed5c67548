//! # stagelex
//!
//! Runs the six-stage lexical pipeline over a source file, or over every
//! source file of a directory in batch mode.

mod display;

use clap::{Parser, ValueEnum};
use stagelex::batch::{self, BatchConfig};
use stagelex::config::runtime::{LexicalPreferences, LogLevel, LoggingPreferences};
use stagelex::grammar::LanguageProfile;
use stagelex::logging::{self, codes, FacadeLogger, LoggingService};
use stagelex::pipeline::{self, PipelineReport, Stage};
use stagelex::source::SourceReader;
use stagelex::{log_error, log_info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "stagelex", version, about = "Staged lexical analysis of C-family source text")]
struct Cli {
    /// Source file, or a directory to process in batch mode
    input: PathBuf,

    /// Show only this stage (name, short alias or number 1-6)
    #[arg(long, value_parser = parse_stage)]
    stage: Option<Stage>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Language profile TOML file, or the name of a built-in profile
    #[arg(long)]
    profile: Option<String>,

    /// Worker threads for batch mode
    #[arg(long, default_value_t = num_cpus::get())]
    threads: usize,

    /// Don't search subdirectories in batch mode
    #[arg(long)]
    no_recursive: bool,

    /// Stop a batch at the first file that fails to process
    #[arg(long)]
    fail_fast: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_stage(name: &str) -> Result<Stage, String> {
    match Stage::from_name(name) {
        Some(Stage::Raw) => Err("the raw source is not a stage; pick 1-6".to_string()),
        Some(stage) => Ok(stage),
        None => Err(format!("unknown stage '{}'", name)),
    }
}

impl Cli {
    fn log_level(&self) -> LogLevel {
        match (self.quiet, self.verbose) {
            (true, _) => LogLevel::Error,
            (false, 0) => LogLevel::Warning,
            (false, 1) => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

fn facade_filter(level: LogLevel) -> log::LevelFilter {
    match level {
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warning => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
    }
}

/// Route stagelex events through `log` so env_logger decides what is shown
fn init_logging(level: LogLevel) -> Result<(), String> {
    env_logger::Builder::new()
        .filter_level(facade_filter(level))
        .parse_default_env()
        .init();

    logging::config::init_runtime_preferences(LoggingPreferences {
        use_structured_logging: false,
        use_log_facade: true,
        min_log_level: level,
        include_file_context: true,
    })?;

    let service = LoggingService::new(Arc::new(FacadeLogger::new()), level.to_events_log_level());
    logging::init_global_logging_with_service(Arc::new(service))
}

fn load_profile(selection: Option<&str>) -> Result<LanguageProfile, Box<dyn std::error::Error>> {
    let Some(selection) = selection else {
        return Ok(LanguageProfile::cpp());
    };
    if let Some(profile) = LanguageProfile::builtin(selection) {
        return Ok(profile);
    }
    LanguageProfile::from_toml_file(Path::new(selection)).map_err(|e| {
        log_error!(e.error_code(), "Failed to load language profile",
            "profile" => selection,
            "error" => &e
        );
        e.into()
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level()).map_err(|e| {
        logging::safe_log_error(codes::system::INITIALIZATION_FAILURE, &e);
        e
    })?;
    log_info!("stagelex starting",
        "input" => cli.input.display(),
        "limits" => stagelex::config::build_info::source_info()
    );

    let profile = load_profile(cli.profile.as_deref())?;

    let failed = if cli.input.is_file() {
        run_single_file(&cli, &profile)?
    } else if cli.input.is_dir() {
        run_batch(&cli, &profile)?
    } else {
        log_error!(codes::source::FILE_NOT_FOUND, "Input is neither a file nor a directory",
            "input" => cli.input.display()
        );
        eprintln!("Error: input must be a source file or a directory");
        eprintln!("  Path: {}", cli.input.display());
        true
    };

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

/// Returns whether the run failed or produced error diagnostics
fn run_single_file(cli: &Cli, profile: &LanguageProfile) -> Result<bool, Box<dyn std::error::Error>> {
    let preferences = LexicalPreferences::default();
    let reader = SourceReader::new();

    let outcome = logging::with_file_context(cli.input.clone(), 0, || {
        pipeline::process_file_with(&cli.input, &reader, profile, &preferences)
    });
    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error[{}]: {}", e.error_code().as_str(), e);
            eprintln!("  --> {}", cli.input.display());
            return Ok(true);
        }
    };

    match cli.format {
        OutputFormat::Json => {
            let mut report = PipelineReport::from_result(&result);
            if let Some(stage) = cli.stage {
                report = report.only_stage(stage);
            }
            println!("{}", report.to_json()?);
        }
        OutputFormat::Text => print!("{}", display::render_result(&result, cli.stage)),
    }

    Ok(result.has_errors())
}

fn run_batch(cli: &Cli, profile: &LanguageProfile) -> Result<bool, Box<dyn std::error::Error>> {
    let config = BatchConfig {
        max_threads: cli.threads,
        recursive: !cli.no_recursive,
        fail_fast: cli.fail_fast,
        ..BatchConfig::default()
    };

    let results = match batch::process_directory(&cli.input, &config, profile) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("error[{}]: {}", e.error_code().as_str(), e);
            return Ok(true);
        }
    };

    match cli.format {
        OutputFormat::Json => {
            let reports: Vec<PipelineReport> = results
                .successful_files
                .iter()
                .map(|(_, result)| {
                    let report = PipelineReport::from_result(result);
                    match cli.stage {
                        Some(stage) => report.only_stage(stage),
                        None => report,
                    }
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Text => {
            print!("{}", display::render_batch(&results));
            let collected = logging::format_cargo_style_summary();
            if !collected.is_empty() && !cli.quiet {
                eprintln!("\n{}", collected);
            }
        }
    }

    Ok(results.has_failures())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from([
            "stagelex", "src/", "--stage", "constants", "--format", "json", "--threads", "2",
            "--no-recursive", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.stage, Some(Stage::ConstantsTagged));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.threads, 2);
        assert!(cli.no_recursive);
        assert_eq!(cli.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_raw_is_not_a_stage() {
        assert!(Cli::try_parse_from(["stagelex", "a.cpp", "--stage", "raw"]).is_err());
        assert!(Cli::try_parse_from(["stagelex", "a.cpp", "--stage", "lexing"]).is_err());
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        let cli = Cli::try_parse_from(["stagelex", "a.cpp", "-q", "-v"]).unwrap();
        assert_eq!(cli.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_profile_selection() {
        assert_eq!(load_profile(None).unwrap().name, "cpp");
        assert_eq!(load_profile(Some("c++")).unwrap().name, "cpp");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mini.toml");
        std::fs::write(&path, "name = \"mini\"\nkeywords = [\"let\"]\noperators = [\"=\"]\npunctuators = [\";\"]\n")
            .unwrap();
        let profile = load_profile(path.to_str()).unwrap();
        assert_eq!(profile.name, "mini");
        assert!(load_profile(Some("missing-profile.toml")).is_err());
    }
}
