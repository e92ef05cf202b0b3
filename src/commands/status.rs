//! Implementation of the `skillpub status` command.

use crate::{
    commands::ColorChoice,
    config::Config,
    error::{Error, Result},
    palette::{fmt_description, fmt_label, fmt_state, fmt_skill_name},
    worker::{CliStatus, Worker},
};

/// Execute the status command.
pub async fn run(color: ColorChoice, config: &Config, json: bool) -> Result<()> {
    let worker = Worker::from_config(config);
    let status = worker.fetch_status().await;

    if json {
        let rendered = serde_json::to_string_pretty(&status)
            .map_err(|source| Error::StatusSerialize { source })?;
        println!("{rendered}");
        return Ok(());
    }

    let hint = login_hint(config);
    for line in render_status(&status, &hint, color.enabled()) {
        println!("{line}");
    }
    Ok(())
}

/// Command the user runs to sign in.
fn login_hint(config: &Config) -> String {
    let command = [config.program.as_str(), config.package.as_str(), "login"]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!("Run `{command}` to sign in.")
}

/// Render a status as human-readable lines.
fn render_status(status: &CliStatus, hint: &str, use_color: bool) -> Vec<String> {
    let yes_no = |value: bool| fmt_state(if value { "yes" } else { "no" }, value, use_color);
    let mut lines = vec![
        format!("{} {}", fmt_label("installed:", use_color), yes_no(status.is_installed)),
        format!("{} {}", fmt_label("logged in:", use_color), yes_no(status.is_logged_in)),
    ];

    if let Some(username) = &status.username {
        lines.push(format!(
            "{} {}",
            fmt_label("user:", use_color),
            fmt_skill_name(username, use_color)
        ));
    }
    if let Some(message) = &status.error_message {
        lines.push(fmt_description(message, use_color));
    } else if status.is_installed && !status.is_logged_in {
        lines.push(fmt_description(hint, use_color));
    }
    lines
}
