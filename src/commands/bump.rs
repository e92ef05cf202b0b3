//! Implementation of the `skillpub bump` command.

use crate::{
    commands::ColorChoice,
    error::{Error, Result},
    palette::fmt_version,
    version::{PublishBump, bump_version},
};

/// Execute the bump command.
pub fn run(color: ColorChoice, current: &str, bump: PublishBump) -> Result<()> {
    let next = bump_version(current, bump).ok_or_else(|| Error::InvalidVersion {
        version: current.to_string(),
    })?;
    println!("{}", fmt_version(&next, color.enabled()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::{commands::ColorChoice, error::Error, version::PublishBump};

    #[test]
    fn rejects_unparsable_version() {
        let error = run(ColorChoice::Never, "1.2", PublishBump::Patch).expect_err("fails");
        assert!(matches!(error, Error::InvalidVersion { ref version } if version == "1.2"));
    }

    #[test]
    fn accepts_valid_version() {
        run(ColorChoice::Never, "1.2.3", PublishBump::Major).expect("bump succeeds");
    }
}
