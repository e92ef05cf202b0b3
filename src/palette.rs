//! Color palette and styling for CLI output.

use owo_colors::{OwoColorize, Style};

/// Style for skill names.
fn skill_name() -> Style {
    Style::new().cyan().bold()
}

/// Style for labels like "installed:" or "version:".
fn label() -> Style {
    Style::new().blue()
}

/// Style for version numbers.
fn version() -> Style {
    Style::new().magenta().bold()
}

/// Style for positive states.
fn positive() -> Style {
    Style::new().green()
}

/// Style for negative states.
fn negative() -> Style {
    Style::new().red()
}

/// Style for secondary text.
fn description() -> Style {
    Style::new().dimmed()
}

/// Apply `style` when color is enabled.
fn paint(text: &str, style: Style, use_color: bool) -> String {
    if use_color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Format a skill name with styling.
pub fn fmt_skill_name(name: &str, use_color: bool) -> String {
    paint(name, skill_name(), use_color)
}

/// Format a label with styling.
pub fn fmt_label(text: &str, use_color: bool) -> String {
    paint(text, label(), use_color)
}

/// Format a version with styling.
pub fn fmt_version(text: &str, use_color: bool) -> String {
    paint(text, version(), use_color)
}

/// Format a yes/no state, green when `good`.
pub fn fmt_state(text: &str, good: bool, use_color: bool) -> String {
    let style = if good { positive() } else { negative() };
    paint(text, style, use_color)
}

/// Format secondary text with styling.
pub fn fmt_description(text: &str, use_color: bool) -> String {
    paint(text, description(), use_color)
}
