use semver::Version;

use super::Registry;
use crate::domain::{parse_version, DistTag};
use crate::error::{PublishError, Result};
use crate::runner::{CommandLine, CommandRunner};

/// Registry backed by the npm command line
pub struct NpmRegistry<R: CommandRunner> {
    runner: R,
    command: String,
    publish_args: Vec<String>,
}

impl<R: CommandRunner> NpmRegistry<R> {
    pub fn new(runner: R) -> Self {
        NpmRegistry {
            runner,
            command: "npm".to_string(),
            publish_args: Vec::new(),
        }
    }

    /// Use a different executable (e.g. a wrapper script or a pinned npm path)
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Extra arguments passed to every publish (e.g. `--access public`)
    pub fn with_publish_args(mut self, args: Vec<String>) -> Self {
        self.publish_args = args;
        self
    }

    fn npm(&self) -> CommandLine {
        CommandLine::new(self.command.clone())
    }
}

impl<R: CommandRunner> Registry for NpmRegistry<R> {
    fn set_version(&self, version: &Version) -> Result<()> {
        let cmd = self.npm().arg("version").arg(version.to_string()).args([
            "--force",
            "--no-git-tag-version",
            "--allow-same-version",
        ]);
        self.runner.run(&cmd)?;
        Ok(())
    }

    fn publish(&self, tags: &[DistTag]) -> Result<()> {
        let cmd = self
            .npm()
            .arg("publish")
            .args(self.publish_args.iter().cloned())
            .args(tags.iter().map(|tag| format!("--tag={}", tag)));
        self.runner.run(&cmd)?;
        Ok(())
    }

    fn add_dist_tag(&self, package: &str, version: &Version, tag: &DistTag) -> Result<()> {
        let cmd = self
            .npm()
            .args(["dist-tag", "add"])
            .arg(format!("{}@{}", package, version))
            .arg(tag.as_str());
        self.runner.run(&cmd)?;
        Ok(())
    }

    fn query_dist_tag(&self, tag: &DistTag) -> Result<Option<Version>> {
        let cmd = self
            .npm()
            .args(["view", "."])
            .arg(format!("dist-tags.{}", tag));
        let out = self.runner.run(&cmd)?;
        let out = out.trim();
        if out.is_empty() {
            return Ok(None);
        }
        parse_version(out).map(Some)
    }

    fn query_name(&self) -> Result<String> {
        let cmd = self.npm().args(["view", ".", "name"]);
        let name = self.runner.run(&cmd)?.trim().to_string();
        if name.is_empty() {
            return Err(PublishError::command(
                cmd.to_string(),
                "registry returned no package name",
                Some(0),
            ));
        }
        Ok(name)
    }
}
