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
use zeroize::Zeroizing;

use crate::cli::Cli;

/// Username and password for the target node.
///
/// The node's host key is accepted unconditionally: the tool talks to
/// freshly imaged devices on an isolated install subnet, which have no
/// stable key to pin. The password is zeroed when dropped.
pub struct Credentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

/// Everything one deployment run needs, resolved up front.
///
/// All fields have documented defaults matching the factory image of the
/// camera nodes; the CLI can override each one.
pub struct DeployConfig {
    /// Local path of the client executable.
    pub artifact: PathBuf,
    /// Local path of the systemd unit file.
    pub unit_file: PathBuf,
    /// Remote directory the executable lands in.
    pub install_dir: String,
    /// Remote systemd unit directory.
    pub unit_dir: String,
    /// Service name, without the `.service` suffix.
    pub service: String,
    /// Permission bits declared in the SCP header. The remote file ends up
    /// with these bits regardless of the local file's mode.
    pub scp_mode: u32,
    /// Per-step timeout in seconds; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            artifact: PathBuf::from("listen"),
            unit_file: PathBuf::from("listencpp.service"),
            install_dir: "/camsoft".to_string(),
            unit_dir: "/etc/systemd/system/".to_string(),
            service: "listencpp".to_string(),
            scp_mode: 0o644,
            timeout_secs: 0,
        }
    }
}

impl DeployConfig {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let scp_mode = cli
            .scp_mode()
            .map_err(|e| anyhow::anyhow!("invalid --mode '{}': {}", cli.mode, e))?;
        Ok(Self {
            artifact: cli.artifact.clone(),
            unit_file: cli.unit_file.clone(),
            install_dir: cli.install_dir.clone(),
            unit_dir: cli.unit_dir.clone(),
            service: cli.service.clone(),
            scp_mode,
            timeout_secs: cli.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_factory_image() {
        let config = DeployConfig::default();
        assert_eq!(config.artifact, PathBuf::from("listen"));
        assert_eq!(config.install_dir, "/camsoft");
        assert_eq!(config.unit_dir, "/etc/systemd/system/");
        assert_eq!(config.service, "listencpp");
        assert_eq!(config.scp_mode, 0o644);
        assert_eq!(config.timeout_secs, 0);
    }

    #[test]
    fn test_credentials_hold_username() {
        let creds = Credentials::new("root", "3dscan");
        assert_eq!(creds.username, "root");
        assert_eq!(&*creds.password, "3dscan");
    }
}
