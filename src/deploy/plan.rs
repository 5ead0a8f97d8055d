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

use std::path::PathBuf;

use crate::config::DeployConfig;

/// One unit of deployment work. Transfers carry the local source and the
/// remote destination directory; the file is stat'd when the step runs,
/// immediately before the transfer. Commands carry the literal shell
/// string, executed once.
#[derive(Debug, Clone)]
pub enum Step {
    Transfer {
        label: &'static str,
        local: PathBuf,
        remote_dir: String,
        mode: u32,
    },
    Command {
        label: &'static str,
        command: String,
    },
}

impl Step {
    pub fn label(&self) -> &'static str {
        match self {
            Step::Transfer { label, .. } => label,
            Step::Command { label, .. } => label,
        }
    }
}

/// Ordered steps for one run. Steps execute strictly in order and a later
/// step never runs once an earlier one has failed.
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    steps: Vec<Step>,
}

impl DeploymentPlan {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// The standard provisioning sequence: install the executable, install
    /// the unit file, mark the executable runnable, then reload systemd and
    /// enable, start and query the service.
    pub fn standard(config: &DeployConfig) -> Self {
        let artifact_name = config
            .artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.artifact.display().to_string());
        let installed_path = format!(
            "{}/{}",
            config.install_dir.trim_end_matches('/'),
            artifact_name
        );

        Self::new(vec![
            Step::Transfer {
                label: "install executable",
                local: config.artifact.clone(),
                remote_dir: config.install_dir.clone(),
                mode: config.scp_mode,
            },
            Step::Transfer {
                label: "install unit file",
                local: config.unit_file.clone(),
                remote_dir: config.unit_dir.clone(),
                mode: config.scp_mode,
            },
            Step::Command {
                label: "mark executable runnable",
                command: format!("chmod +x {installed_path}"),
            },
            Step::Command {
                label: "enable and start service",
                command: service_command(&config.service),
            },
        ])
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// The one-shot systemd activation command for a service name.
pub fn service_command(service: &str) -> String {
    format!(
        "systemctl daemon-reload && systemctl enable {service}.service && systemctl start {service}.service && systemctl status {service}.service"
    )
}
