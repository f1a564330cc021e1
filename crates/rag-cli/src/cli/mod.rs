use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use rag_config::GeneralConfig;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};
pub use root_commands::Commands;

/// Top-level CLI parser for the `ragc` binary.
#[derive(Debug, Parser)]
#[command(name = "ragc", version, about = "Ragdesk - chat with your documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw (defaults to general.default_format)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Quiet mode (suppress notices and progress)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Colorize table output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Show progress spinners
    #[arg(long, global = true, value_enum, default_value_t = ProgressMode::Auto)]
    pub progress: ProgressMode,
}

impl Cli {
    /// Resolve the flags handed to command handlers. An explicit `--format`
    /// wins over the configured default.
    ///
    /// # Errors
    ///
    /// Fails if `general.default_format` names an unknown format.
    pub fn global_flags(&self, general: &GeneralConfig) -> anyhow::Result<GlobalFlags> {
        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_str(&general.default_format, true).map_err(|_| {
                anyhow!(
                    "invalid general.default_format '{}': expected json, table, or raw",
                    general.default_format
                )
            })?,
        };
        Ok(GlobalFlags {
            format,
            quiet: self.quiet,
            verbose: self.verbose,
            color: self.color,
            progress: self.progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use rag_config::GeneralConfig;

    use super::subcommands::{ChatCommands, DocCommands, SettingsCommands};
    use super::{Cli, ColorMode, Commands, OutputFormat};

    fn general(format: &str) -> GeneralConfig {
        GeneralConfig {
            default_format: format.to_string(),
        }
    }

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["ragc", "--format", "table", "--verbose", "health"])
            .expect("cli should parse");

        assert_eq!(cli.format, Some(OutputFormat::Table));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Health));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["ragc", "health", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, Some(OutputFormat::Raw));
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["ragc", "--format", "xml", "health"]).is_err());
    }

    #[test]
    fn configured_format_applies_without_flag() {
        let cli = Cli::try_parse_from(["ragc", "health"]).expect("cli should parse");
        let flags = cli.global_flags(&general("table")).expect("flags");
        assert_eq!(flags.format, OutputFormat::Table);
        assert_eq!(flags.color, ColorMode::Auto);
    }

    #[test]
    fn explicit_format_overrides_config() {
        let cli = Cli::try_parse_from(["ragc", "-f", "raw", "health"]).expect("cli should parse");
        let flags = cli.global_flags(&general("table")).expect("flags");
        assert_eq!(flags.format, OutputFormat::Raw);
    }

    #[test]
    fn unknown_configured_format_is_an_error() {
        let cli = Cli::try_parse_from(["ragc", "health"]).expect("cli should parse");
        let err = cli.global_flags(&general("yaml")).unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn doc_upload_takes_many_files() {
        let cli = Cli::try_parse_from(["ragc", "doc", "upload", "p1", "a.pdf", "b.txt", "--watch"])
            .expect("cli should parse");
        let Commands::Doc {
            action: DocCommands::Upload(args),
        } = cli.command
        else {
            panic!("expected doc upload");
        };
        assert_eq!(args.project_id, "p1");
        assert_eq!(args.files.len(), 2);
        assert!(args.watch);
    }

    #[test]
    fn doc_upload_requires_a_file() {
        assert!(Cli::try_parse_from(["ragc", "doc", "upload", "p1"]).is_err());
    }

    #[test]
    fn settings_publish_parses_assignments() {
        let cli = Cli::try_parse_from([
            "ragc",
            "settings",
            "publish",
            "p1",
            "--set",
            "chunks_per_search=12",
            "--set",
            "reranking_enabled=false",
        ])
        .expect("cli should parse");
        let Commands::Settings {
            action: SettingsCommands::Publish(args),
        } = cli.command
        else {
            panic!("expected settings publish");
        };
        assert_eq!(args.set.len(), 2);
        assert_eq!(args.set[0].key(), "chunks_per_search");
        assert!(!args.dry_run);
    }

    #[test]
    fn settings_publish_rejects_unknown_key() {
        let parsed = Cli::try_parse_from(["ragc", "settings", "publish", "p1", "--set", "temp=1"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn chat_feedback_requires_rating() {
        assert!(Cli::try_parse_from(["ragc", "chat", "feedback", "p1", "c1", "m1"]).is_err());

        let cli = Cli::try_parse_from([
            "ragc", "chat", "feedback", "p1", "c1", "m1", "--rating", "dislike", "--comment",
            "wrong doc",
        ])
        .expect("cli should parse");
        let Commands::Chat {
            action: ChatCommands::Feedback(args),
        } = cli.command
        else {
            panic!("expected chat feedback");
        };
        assert_eq!(args.message_id, "m1");
        assert_eq!(args.comment.as_deref(), Some("wrong doc"));
    }
}
