use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::report::ReportFormat;

/// Command line interface definition for aida.
#[derive(Parser, Debug)]
#[command(name = "aida")]
#[command(about = "AI Development Accounting - metrics for AI-assisted development")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Command selected by CLI parsing.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Collect commits and generate commit-stream.json
    Collect(CollectArgs),
    /// Analyze commit stream and generate metrics.json
    Analyze(AnalyzeArgs),
    /// Generate report from metrics.json
    Report(ReportArgs),
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output directory (default: ./aida-output)
    #[arg(long, value_name = "PATH")]
    pub out_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
    /// Repository path (default: current directory)
    #[arg(long, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// Start date (ISO or relative like 90d)
    #[arg(long, value_name = "DATE")]
    pub since: Option<String>,

    /// End date (ISO or relative)
    #[arg(long, value_name = "DATE")]
    pub until: Option<String>,

    /// AI detection pattern (repeatable)
    #[arg(long = "ai-pattern", value_name = "PATTERN")]
    pub ai_patterns: Vec<String>,

    /// Default branch name (auto-detect if omitted)
    #[arg(long, value_name = "NAME")]
    pub default_branch: Option<String>,

    /// Maximum number of commits to read
    #[arg(long, default_value_t = crate::collect::DEFAULT_MAX_COUNT)]
    pub max_count: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "both")]
    pub format: ReportFormat,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_collect_with_repeated_patterns() {
        let cli = Cli::try_parse_from([
            "aida",
            "-v",
            "collect",
            "--repo",
            "/tmp/repo",
            "--since",
            "90d",
            "--ai-pattern",
            "claude",
            "--ai-pattern",
            "gpt-4",
            "--out-dir",
            "out",
        ])
        .unwrap();

        assert_eq!(cli.verbosity, 1);
        match cli.command {
            Command::Collect(args) => {
                assert_eq!(args.repo, Some(PathBuf::from("/tmp/repo")));
                assert_eq!(args.since.as_deref(), Some("90d"));
                assert_eq!(args.ai_patterns, vec!["claude", "gpt-4"]);
                assert_eq!(args.max_count, crate::collect::DEFAULT_MAX_COUNT);
                assert_eq!(args.output.out_dir, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parses_report_format() {
        let cli = Cli::try_parse_from(["aida", "report", "--format", "md"]).unwrap();
        match cli.command {
            Command::Report(args) => assert_eq!(args.format, ReportFormat::Md),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["aida", "-q", "-v", "analyze"]).is_err());
    }
}
