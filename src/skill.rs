//! Skill artifact validation before publishing.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    paths::normalize_path,
};

/// The expected skill file name within a skill directory.
pub const SKILL_FILE_NAME: &str = "SKILL.md";

/// A skill directory that is ready to publish.
#[derive(Debug, Clone)]
pub struct SkillArtifact {
    /// Skill name from frontmatter.
    pub(crate) name: String,
    /// Skill description from frontmatter.
    pub(crate) description: String,
    /// Normalized skill directory.
    pub(crate) dir: PathBuf,
}

/// Frontmatter fields we require.
#[derive(Debug, Deserialize)]
struct RawFrontmatter {
    /// The declared skill name.
    name: Option<String>,
    /// The declared skill description.
    description: Option<String>,
}

impl SkillArtifact {
    /// Load and validate the skill in `dir`.
    pub(crate) fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::ArtifactMissing {
                path: dir.to_path_buf(),
            });
        }

        let dir = normalize_path(dir);
        let skill_path = dir.join(SKILL_FILE_NAME);
        let contents = fs::read_to_string(&skill_path).map_err(|source| Error::SkillRead {
            path: skill_path.clone(),
            source,
        })?;

        let invalid = |message: String| Error::InvalidSkill {
            path: skill_path.clone(),
            message,
        };
        let yaml = frontmatter(&contents)
            .ok_or_else(|| invalid("missing YAML frontmatter".to_string()))?;
        let raw: RawFrontmatter =
            serde_yaml::from_str(yaml).map_err(|error| invalid(error.to_string()))?;

        let name = required(raw.name).ok_or_else(|| invalid(missing("name")))?;
        let description = required(raw.description)
            .ok_or_else(|| invalid(missing("description")))?;

        Ok(Self {
            name,
            description,
            dir,
        })
    }
}

/// Trimmed value of a required field, if non-blank.
fn required(value: Option<String>) -> Option<String> {
    let value = value?.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Message for a missing required field.
fn missing(field: &str) -> String {
    format!("missing required field '{field}'")
}

/// The YAML between a leading `---` line and the next `---` line.
fn frontmatter(contents: &str) -> Option<&str> {
    let mut lines = contents.split_inclusive('\n');
    let opening = lines.next()?;
    if opening.trim_end_matches(['\r', '\n']) != "---" {
        return None;
    }

    let start = opening.len();
    let mut end = start;
    for line in lines {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return Some(&contents[start..end]);
        }
        end += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::{
        error::Error,
        skill::{SkillArtifact, frontmatter},
        testutil::{skill_content, write_skill},
    };

    #[test]
    fn loads_valid_skill() {
        let dir = tempdir().expect("tempdir");
        let skill_dir = write_skill(dir.path(), "pdf", &skill_content("pdf", "Work with PDFs"));

        let artifact = SkillArtifact::load(&skill_dir).expect("skill loads");
        assert_eq!(artifact.name, "pdf");
        assert_eq!(artifact.description, "Work with PDFs");
        assert!(artifact.dir.ends_with("pdf"));
    }

    #[test]
    fn rejects_missing_directory() {
        let dir = tempdir().expect("tempdir");
        let error = SkillArtifact::load(&dir.path().join("absent")).expect_err("fails");
        assert!(matches!(error, Error::ArtifactMissing { .. }));
    }

    #[test]
    fn rejects_directory_without_skill_file() {
        let dir = tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("empty")).expect("mkdir");
        let error = SkillArtifact::load(&dir.path().join("empty")).expect_err("fails");
        assert!(matches!(error, Error::SkillRead { .. }));
    }

    #[test]
    fn rejects_missing_description() {
        let dir = tempdir().expect("tempdir");
        let skill_dir = write_skill(dir.path(), "pdf", "---\nname: pdf\n---\n");
        let error = SkillArtifact::load(&skill_dir).expect_err("fails");
        assert!(matches!(
            error,
            Error::InvalidSkill { ref message, .. } if message == "missing required field 'description'"
        ));
    }

    #[test]
    fn finds_frontmatter_with_crlf() {
        assert_eq!(frontmatter("---\r\nname: a\r\n---\r\nbody"), Some("name: a\r\n"));
        assert_eq!(frontmatter("# Title\n"), None);
        assert_eq!(frontmatter("---\nname: a\n"), None);
    }
}
