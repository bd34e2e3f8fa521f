//! SiteDeployer -- [`Deployer`] that builds the site and pushes it with git.
//!
//! Steps run in order inside the site root; the first one that fails to spawn
//! or exits non-zero aborts the deploy.

use std::path::PathBuf;
use std::process::Stdio;

use ballgen_core::publish::Deployer;
use ballgen_types::config::DeploySettings;
use ballgen_types::error::DeployError;

#[derive(Debug, Clone)]
pub struct SiteDeployer {
    settings: DeploySettings,
    site_root: PathBuf,
}

impl SiteDeployer {
    pub fn new(settings: &DeploySettings, site_root: impl Into<PathBuf>) -> Self {
        Self {
            settings: settings.clone(),
            site_root: site_root.into(),
        }
    }

    /// The commands a deploy runs, in order.
    pub fn steps(&self, commit_message: &str) -> Vec<Vec<String>> {
        let mut steps = Vec::new();
        if !self.settings.build_command.is_empty() {
            steps.push(self.settings.build_command.clone());
        }
        if self.settings.commit {
            steps.push(vec!["git".into(), "add".into(), ".".into()]);
            steps.push(vec![
                "git".into(),
                "commit".into(),
                "-m".into(),
                commit_message.to_string(),
            ]);
        }
        if self.settings.push {
            steps.push(vec!["git".into(), "push".into()]);
        }
        steps
    }

    async fn run_step(&self, argv: &[String]) -> Result<(), DeployError> {
        let command = argv.join(" ");
        let Some((program, args)) = argv.split_first() else {
            return Ok(());
        };

        tracing::info!(command = %command, "running deploy step");
        let output = tokio::process::Command::new(program)
            .args(args)
            .current_dir(&self.site_root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| DeployError::Spawn {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::warn!(command = %command, stderr = %stderr.trim(), "deploy step failed");
        Err(DeployError::CommandFailed {
            command,
            status: output.status.to_string(),
        })
    }
}

impl Deployer for SiteDeployer {
    #[tracing::instrument(name = "deploy", skip(self), fields(site_root = %self.site_root.display()))]
    async fn deploy(&self, commit_message: &str) -> Result<(), DeployError> {
        if !self.settings.enabled {
            return Err(DeployError::Disabled);
        }
        for step in self.steps(commit_message) {
            self.run_step(&step).await?;
        }
        tracing::info!("deploy completed");
        Ok(())
    }
}
