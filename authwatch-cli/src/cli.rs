//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use authwatch_analyzer::ScenarioKind;
use authwatch_analyzer::scenario::{MAX_COUNT, MAX_MINUTES};
use authwatch_core::types::Severity;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "authwatch.toml";

/// authwatch -- auth-log incident detection.
///
/// Use `authwatch <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "authwatch", version, about, long_about = None)]
pub struct Cli {
    /// Path to the authwatch.toml configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Severity threshold accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityArg {
    Low,
    Medium,
    High,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Low => Severity::Low,
            SeverityArg::Medium => Severity::Medium,
            SeverityArg::High => Severity::High,
        }
    }
}

/// Scenario kinds accepted by `generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioArg {
    BruteForce,
    SudoViolation,
    CredentialStuffing,
    SuspiciousLogin,
    Normal,
    Mixed,
}

impl From<ScenarioArg> for ScenarioKind {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::BruteForce => ScenarioKind::BruteForce,
            ScenarioArg::SudoViolation => ScenarioKind::SudoViolation,
            ScenarioArg::CredentialStuffing => ScenarioKind::CredentialStuffing,
            ScenarioArg::SuspiciousLogin => ScenarioKind::SuspiciousLogin,
            ScenarioArg::Normal => ScenarioKind::Normal,
            ScenarioArg::Mixed => ScenarioKind::Mixed,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse auth-log files and report detected incidents.
    Analyze(AnalyzeArgs),

    /// Generate a synthetic attack scenario.
    Generate(GenerateArgs),

    /// List the detection rules.
    Rules,

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- analyze ----

/// Analyze one or more auth-log files.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Log files to analyze (`-` reads stdin).
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Only report incidents at or above this severity.
    #[arg(long, value_enum)]
    pub min_severity: Option<SeverityArg>,

    /// Append an incident summary (counts, top IPs, top users).
    #[arg(long)]
    pub summary: bool,

    /// Exit with code 4 if any incident at or above this severity is found.
    #[arg(long, value_enum)]
    pub fail_on: Option<SeverityArg>,
}

// ---- generate ----

/// Generate synthetic auth-log lines.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Scenario kind.
    #[arg(value_enum)]
    pub kind: ScenarioArg,

    /// Number of attack events (scenario default when omitted, at most 10000).
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(0..=MAX_COUNT as u64))]
    pub count: Option<usize>,

    /// Time span in minutes (scenario default when omitted, 1 to 1440).
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..=MAX_MINUTES))]
    pub minutes: Option<i64>,

    /// RNG seed for reproducible output (overrides `[generator] seed`).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write log lines to this file instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Also run the rule engine on the generated lines.
    #[arg(long)]
    pub analyze: bool,
}

// ---- config ----

/// Manage authwatch configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, analyzer, generator).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_analyze_defaults() {
        let cli = Cli::try_parse_from(["authwatch", "analyze", "auth.log"]).expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("authwatch.toml"));
        assert_eq!(cli.output, OutputFormat::Text);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.files, vec![PathBuf::from("auth.log")]);
                assert!(args.min_severity.is_none());
                assert!(!args.summary);
                assert!(args.fail_on.is_none());
            }
            _ => panic!("expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_parse_analyze_all_flags() {
        let cli = Cli::try_parse_from([
            "authwatch",
            "analyze",
            "a.log",
            "b.log",
            "--min-severity",
            "medium",
            "--summary",
            "--fail-on",
            "high",
            "--output",
            "json",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.min_severity, Some(SeverityArg::Medium));
                assert!(args.summary);
                assert_eq!(args.fail_on, Some(SeverityArg::High));
            }
            _ => panic!("expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_parse_analyze_requires_file() {
        assert!(Cli::try_parse_from(["authwatch", "analyze"]).is_err());
    }

    #[test]
    fn test_cli_parse_analyze_rejects_unknown_severity() {
        let result = Cli::try_parse_from(["authwatch", "analyze", "x.log", "--fail-on", "critical"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::try_parse_from([
            "authwatch",
            "generate",
            "credential-stuffing",
            "--minutes",
            "3",
            "--seed",
            "42",
            "--analyze",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.kind, ScenarioArg::CredentialStuffing);
                assert_eq!(args.minutes, Some(3));
                assert_eq!(args.seed, Some(42));
                assert!(args.analyze);
                assert!(args.out.is_none());
                assert!(args.count.is_none());
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_generate_rejects_out_of_range_minutes() {
        for minutes in ["0", "-3", "1441", "200000000000000000"] {
            let result =
                Cli::try_parse_from(["authwatch", "generate", "normal", "--minutes", minutes]);
            assert!(result.is_err(), "minutes {minutes} should be rejected");
        }
        let cli = Cli::try_parse_from(["authwatch", "generate", "normal", "--minutes", "1440"])
            .expect("upper bound accepted");
        match cli.command {
            Commands::Generate(args) => assert_eq!(args.minutes, Some(1440)),
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_generate_rejects_out_of_range_count() {
        assert!(
            Cli::try_parse_from(["authwatch", "generate", "brute-force", "--count", "10001"])
                .is_err()
        );
        assert!(
            Cli::try_parse_from(["authwatch", "generate", "brute-force", "--count", "-1"]).is_err()
        );
        let cli = Cli::try_parse_from(["authwatch", "generate", "brute-force", "--count", "10000"])
            .expect("upper bound accepted");
        match cli.command {
            Commands::Generate(args) => assert_eq!(args.count, Some(10_000)),
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_generate_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["authwatch", "generate", "port-scan"]).is_err());
    }

    #[test]
    fn test_cli_parse_rules_with_config() {
        let cli = Cli::try_parse_from(["authwatch", "-c", "/etc/authwatch.toml", "rules"])
            .expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("/etc/authwatch.toml"));
        assert!(matches!(cli.command, Commands::Rules));
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["authwatch", "config", "show", "--section", "analyzer"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Show { section },
            }) => assert_eq!(section.as_deref(), Some("analyzer")),
            _ => panic!("expected Config Show command"),
        }
    }

    #[test]
    fn test_cli_parse_global_log_level_after_subcommand() {
        let cli = Cli::try_parse_from(["authwatch", "rules", "--log-level", "debug"])
            .expect("parse succeeded");
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_severity_arg_conversion() {
        assert_eq!(Severity::from(SeverityArg::Low), Severity::Low);
        assert_eq!(Severity::from(SeverityArg::High), Severity::High);
        assert_eq!(
            ScenarioKind::from(ScenarioArg::SuspiciousLogin),
            ScenarioKind::SuspiciousLogin
        );
    }
}
