//! CLI parsing and command dispatch.

use std::{io, path::PathBuf, time::Duration};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

use crate::{
    commands::{self, publish::PublishArgs},
    config::Config,
    error::Result,
    platform::Platform,
    version::PublishBump,
};

/// Parsed command line arguments.
#[derive(Debug, Parser)]
#[command(name = "skillpub", version, about = "Publish agent skills to Clawhub")]
struct Cli {
    /// Control colored output.
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorMode,
    /// Enable verbose output.
    #[arg(long)]
    verbose: bool,
    /// Read configuration from this file instead of ~/.skillpub.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Give up on the external CLI after this many seconds.
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: Option<u64>,
    /// Command to execute (defaults to status).
    #[command(subcommand)]
    command: Option<Command>,
}

/// Supported color output modes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    /// Only colorize when stdout is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

// Commands are ordered alphabetically - maintain this order.
/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Print the version that follows VERSION.
    Bump {
        /// Current version (major.minor.patch).
        #[arg(value_name = "VERSION")]
        current: String,
        /// Component to increment.
        #[arg(long, value_enum, default_value = "patch")]
        bump: PublishBump,
    },
    /// Publish a skill directory.
    Publish {
        /// Skill directory, or a skill name when --platform is given.
        skill: String,
        /// Look the skill up in this platform's skills directory.
        #[arg(long, value_enum)]
        platform: Option<Platform>,
        /// Version currently published; omit for a first release.
        #[arg(long, value_name = "VERSION")]
        published_version: Option<String>,
        /// Component to increment.
        #[arg(long, value_enum, default_value = "patch")]
        bump: PublishBump,
        /// Release notes.
        #[arg(long)]
        changelog: Option<String>,
        /// Comma-separated tags.
        #[arg(long)]
        tags: Option<String>,
        /// Show the command without running it.
        #[arg(long, short = 'n')]
        dry_run: bool,
        /// Skip prompts.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show whether the registry CLI is installed and logged in.
    #[command(alias = "whoami")]
    Status {
        /// Print the status as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Run the requested command.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let color = cli.color.into_choice();
    let timeout = cli.timeout.map(Duration::from_secs);
    let load_config =
        || Config::load(cli.config.as_deref()).map(|config| config.with_timeout(timeout));

    // Match arms are ordered alphabetically - maintain this order.
    match cli.command.unwrap_or(Command::Status { json: false }) {
        Command::Bump { current, bump } => commands::bump::run(color, &current, bump),
        Command::Publish {
            skill,
            platform,
            published_version,
            bump,
            changelog,
            tags,
            dry_run,
            yes,
        } => {
            let args = PublishArgs {
                skill,
                platform,
                published_version,
                bump,
                changelog,
                tags,
                dry_run,
                yes,
            };
            commands::publish::run(color, &load_config()?, args).await
        }
        Command::Status { json } => commands::status::run(color, &load_config()?, json).await,
    }
}

/// Install the stderr log subscriber, honoring `RUST_LOG` when set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "skillpub=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    if let Err(error) = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
    {
        debug!(%error, "keeping existing log subscriber");
    }
}

impl ColorMode {
    /// Convert a CLI color mode into a color choice.
    fn into_choice(self) -> commands::ColorChoice {
        match self {
            Self::Auto => commands::ColorChoice::Auto,
            Self::Always => commands::ColorChoice::Always,
            Self::Never => commands::ColorChoice::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};
    use crate::{platform::Platform, version::PublishBump};

    #[test]
    fn parses_publish_flags() {
        let cli = Cli::try_parse_from([
            "skillpub",
            "publish",
            "pdf",
            "--platform",
            "opencode",
            "--published-version",
            "1.2.3",
            "--bump",
            "minor",
            "--tags",
            "a, b",
            "--timeout",
            "30",
        ])
        .expect("arguments parse");

        assert_eq!(cli.timeout, Some(30));
        let Some(Command::Publish {
            skill,
            platform,
            published_version,
            bump,
            tags,
            ..
        }) = cli.command
        else {
            panic!("expected publish command");
        };
        assert_eq!(skill, "pdf");
        assert_eq!(platform, Some(Platform::OpenCode));
        assert_eq!(published_version.as_deref(), Some("1.2.3"));
        assert_eq!(bump, PublishBump::Minor);
        assert_eq!(tags.as_deref(), Some("a, b"));
    }

    #[test]
    fn defaults_to_status() {
        let cli = Cli::try_parse_from(["skillpub"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rejects_unknown_bump() {
        assert!(Cli::try_parse_from(["skillpub", "bump", "1.0.0", "--bump", "huge"]).is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(Cli::try_parse_from(["skillpub", "status", "--timeout", "0"]).is_err());
        let cli = Cli::try_parse_from(["skillpub", "status", "--timeout", "1"])
            .expect("arguments parse");
        assert_eq!(cli.timeout, Some(1));
    }
}
