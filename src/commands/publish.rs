//! Implementation of the `skillpub publish` command.

use std::path::PathBuf;

use inquire::{Confirm, Text, error::InquireError};

use crate::{
    commands::ColorChoice,
    config::Config,
    error::{Error, Result},
    palette::{fmt_description, fmt_label, fmt_skill_name, fmt_version},
    paths::display_path,
    platform::Platform,
    skill::SkillArtifact,
    version::{PublishBump, SemVer},
    worker::{PublishRequest, Worker},
};

/// Arguments for the publish command.
#[derive(Debug)]
pub struct PublishArgs {
    /// Skill directory, or a skill name when `platform` is set.
    pub(crate) skill: String,
    /// Platform whose skills directories are searched for `skill`.
    pub(crate) platform: Option<Platform>,
    /// Version currently published.
    pub(crate) published_version: Option<String>,
    /// Component to increment.
    pub(crate) bump: PublishBump,
    /// Release notes.
    pub(crate) changelog: Option<String>,
    /// Comma-separated tags.
    pub(crate) tags: Option<String>,
    /// Show the command without running it.
    pub(crate) dry_run: bool,
    /// Skip prompts.
    pub(crate) yes: bool,
}

/// Execute the publish command.
pub async fn run(color: ColorChoice, config: &Config, args: PublishArgs) -> Result<()> {
    let use_color = color.enabled();
    let dir = match args.platform {
        Some(platform) => platform.resolve_skill(&config.home, &args.skill)?,
        None => PathBuf::from(&args.skill),
    };
    let artifact = SkillArtifact::load(&dir)?;

    if let Some(previous) = &args.published_version
        && previous.parse::<SemVer>().is_err()
    {
        eprintln!("Warning: published version '{previous}' is not major.minor.patch; starting over");
    }

    let interactive = !args.yes && !args.dry_run;
    let changelog = match args.changelog {
        Some(changelog) => changelog,
        None if interactive => prompt_changelog()?,
        None => String::new(),
    };

    let request = PublishRequest::new(artifact.dir.clone(), args.published_version, args.bump)
        .with_changelog(changelog)
        .with_tags(split_tags(args.tags.as_deref()));
    let version = request.target_version();

    println!(
        "{} {}",
        fmt_skill_name(&artifact.name, use_color),
        fmt_description(&artifact.description, use_color)
    );
    println!(
        "  {} {}",
        fmt_label("path:", use_color),
        display_path(&artifact.dir)
    );
    println!(
        "  {} {}",
        fmt_label("version:", use_color),
        fmt_version(&version, use_color)
    );

    let worker = Worker::from_config(config);
    if args.dry_run {
        let command_line = worker.command_line(request.arguments());
        println!(
            "{} {} {}",
            fmt_label("Dry run:", use_color),
            config.program,
            command_line.join(" ")
        );
        return Ok(());
    }

    if interactive {
        let prompt = format!("Publish {} v{version}?", artifact.name);
        if !confirm(&prompt)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let published = worker.publish_skill(&request).await?;
    println!(
        "{} {} v{}",
        fmt_label("Published:", use_color),
        fmt_skill_name(&artifact.name, use_color),
        fmt_version(&published, use_color)
    );
    Ok(())
}

/// Split a comma-separated tag list; cleaning happens in the request.
fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|tags| tags.split(',').map(ToString::to_string).collect())
        .unwrap_or_default()
}

/// Ask for release notes.
fn prompt_changelog() -> Result<String> {
    match Text::new("Changelog").prompt() {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Err(Error::PromptCanceled)
        }
        Err(error) => Err(Error::PromptFailed {
            message: error.to_string(),
        }),
    }
}

/// Prompt the user to confirm a publish.
fn confirm(message: &str) -> Result<bool> {
    match Confirm::new(message).with_default(false).prompt() {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Err(Error::PromptCanceled)
        }
        Err(error) => Err(Error::PromptFailed {
            message: error.to_string(),
        }),
    }
}
