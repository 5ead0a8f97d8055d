// Copyright 2025 Pideploy Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Deployment orchestration: runs a plan step by step against one target,
//! opening a fresh SSH connection per step and stopping at the first
//! failure. There is no rollback; completed steps stay completed.

pub mod plan;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use thiserror::Error;

use crate::config::Credentials;
use crate::ssh::scp::{self, TransferSpec};
use crate::ssh::{self, Client, CommandOutput};
use crate::target::Target;

pub use plan::{DeploymentPlan, Step};

const PROGRESS_BAR_TICK_RATE_MS: u64 = 80;

/// Terminal failure of a run: which step failed, and how far the plan got.
#[derive(Debug, Error)]
#[error("step {step} ({label}) failed after {completed} completed step(s)")]
pub struct DeployError {
    /// 1-based index of the failed step.
    pub step: usize,
    pub label: String,
    /// Steps that had already completed; they are not rolled back.
    pub completed: usize,
    #[source]
    pub source: ssh::Error,
}

/// Outcome of a fully successful run.
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub completed: usize,
    /// Captured stdout of the final service status query.
    pub status_text: String,
}

/// Runs a [`DeploymentPlan`] against one target.
///
/// Owns the credentials for the run and hands them by reference to every
/// connection attempt. Each step gets its own connection and channel,
/// released on every exit path; nothing is shared or pooled across steps.
pub struct Deployer {
    target: Target,
    credentials: Credentials,
    timeout_secs: u64,
}

impl Deployer {
    pub fn new(target: Target, credentials: Credentials) -> Self {
        Self {
            target,
            credentials,
            timeout_secs: 0,
        }
    }

    /// Uniform per-step timeout in seconds; 0 disables it. Applies to the
    /// whole step future, covering channel-open, command execution and
    /// transfer alike.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub async fn run(&self, plan: &DeploymentPlan) -> Result<DeployReport, DeployError> {
        let total = plan.len();
        let mut status_text = String::new();

        let style = ProgressStyle::default_bar()
            .template("{prefix:.bold} {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷ ");

        for (index, step) in plan.steps().iter().enumerate() {
            let pb = ProgressBar::new_spinner();
            pb.set_style(style.clone());
            pb.set_prefix(format!("[{}/{}]", index + 1, total));
            pb.set_message(step.label().to_string());
            pb.enable_steady_tick(Duration::from_millis(PROGRESS_BAR_TICK_RATE_MS));

            match self.run_step(step).await {
                Ok(output) => {
                    pb.finish_with_message(format!("{} {}", "●".green(), step.label().green()));
                    if let Some(output) = output {
                        status_text = output.stdout;
                    }
                }
                Err(source) => {
                    pb.finish_with_message(format!("{} {}", "●".red(), step.label().red()));
                    return Err(DeployError {
                        step: index + 1,
                        label: step.label().to_string(),
                        completed: index,
                        source,
                    });
                }
            }
        }

        Ok(DeployReport {
            completed: total,
            status_text,
        })
    }

    async fn run_step(&self, step: &Step) -> ssh::error::Result<Option<CommandOutput>> {
        let fut = self.run_step_inner(step);
        if self.timeout_secs == 0 {
            return fut.await;
        }
        tokio::time::timeout(Duration::from_secs(self.timeout_secs), fut)
            .await
            .map_err(|_| ssh::Error::Timeout(self.timeout_secs))?
    }

    async fn run_step_inner(&self, step: &Step) -> ssh::error::Result<Option<CommandOutput>> {
        match step {
            Step::Transfer {
                local,
                remote_dir,
                mode,
                ..
            } => {
                // Stat first: a missing artifact must fail the step before
                // any remote channel is opened.
                let spec = TransferSpec::stat(local, remote_dir, *mode)?;
                let client = Client::connect(&self.target, &self.credentials).await?;
                let result = scp::send_file(&client, &spec).await;
                release(&client).await;
                result.map(|()| None)
            }
            Step::Command { command, .. } => {
                let client = Client::connect(&self.target, &self.credentials).await?;
                let result = client.execute(command).await;
                release(&client).await;
                result.map(Some)
            }
        }
    }
}

async fn release(client: &Client) {
    if let Err(e) = client.disconnect().await {
        tracing::debug!("disconnect from {} failed: {}", client.address(), e);
    }
}
