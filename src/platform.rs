//! Skill directory conventions for supported assistant platforms.

use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::error::{Error, Result};

/// Assistant platforms with a skills directory under the home directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Platform {
    /// OpenAI Codex.
    Codex,
    /// Claude Code.
    Claude,
    /// OpenCode.
    #[value(name = "opencode")]
    OpenCode,
    /// GitHub Copilot.
    Copilot,
}

impl Platform {
    /// Return the display name for user output.
    pub(crate) fn display_name(self) -> &'static str {
        match self {
            Self::Codex => "Codex",
            Self::Claude => "Claude Code",
            Self::OpenCode => "OpenCode",
            Self::Copilot => "GitHub Copilot",
        }
    }

    /// Skills directories relative to the home directory, primary first.
    pub(crate) fn relative_paths(self) -> &'static [&'static str] {
        match self {
            Self::Codex => &[".codex/skills", ".codex/skills/public"],
            Self::Claude => &[".claude/skills"],
            Self::OpenCode => &[".config/opencode/skill"],
            Self::Copilot => &[".copilot/skills"],
        }
    }

    /// Find the directory of skill `name` under `home`, checking each skills directory in order.
    pub(crate) fn resolve_skill(self, home: &Path, name: &str) -> Result<PathBuf> {
        self.relative_paths()
            .iter()
            .map(|relative| home.join(relative).join(name))
            .find(|candidate| candidate.is_dir())
            .ok_or_else(|| Error::SkillNotFound {
                name: name.to_string(),
                platform: self.display_name().to_string(),
            })
    }
}
