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

use std::sync::Arc;

use russh::client::{Config, Handle, Handler};

use super::error::{Error, Result};
use crate::config::Credentials;
use crate::target::Target;

/// An authenticated SSH connection to one target node.
///
/// Open one per deployment step with [`Client::connect`]; each operation
/// ([`execute`](Client::execute) or [`scp::send_file`](super::scp::send_file))
/// opens exactly one exec channel on it. Call
/// [`disconnect`](Client::disconnect) when the step is done, on every exit
/// path. A session is single-use and never shared across steps.
pub struct Client {
    handle: Handle<AcceptingHandler>,
    username: String,
    address: String,
}

impl Client {
    /// Connect to `target` and authenticate with the password pair.
    ///
    /// Transport failures come back as [`Error::Connection`], a rejected
    /// password as [`Error::Authentication`].
    pub async fn connect(target: &Target, credentials: &Credentials) -> Result<Self> {
        let address = target.address();
        tracing::debug!("Connecting to {}", address);

        let config = Arc::new(Config::default());
        let handler = AcceptingHandler;

        let mut handle = russh::client::connect(config, (target.host.as_str(), target.port), handler)
            .await
            .map_err(|e| match e {
                Error::Ssh(source) => Error::Connection {
                    address: address.clone(),
                    source,
                },
                other => other,
            })?;

        let auth = handle
            .authenticate_password(credentials.username.as_str(), credentials.password.as_str())
            .await
            .map_err(|source| Error::Connection {
                address: address.clone(),
                source,
            })?;
        if !auth.success() {
            return Err(Error::Authentication {
                username: credentials.username.clone(),
            });
        }

        tracing::debug!("Connected and authenticated as {}", credentials.username);
        Ok(Self {
            handle,
            username: credentials.username.clone(),
            address,
        })
    }

    /// Execute one remote command, capturing its stdout.
    ///
    /// Returns [`Error::Command`] on a non-zero exit status. stderr is not
    /// captured separately; postfix the command with `2>&1` if its output
    /// matters. Every invocation is a fresh shell context.
    pub async fn execute(&self, command: &str) -> Result<CommandOutput> {
        tracing::debug!("Executing command: {}", command);

        let mut stdout = Vec::new();
        let mut channel = self.handle.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut exit_status: Option<u32> = None;

        // The exit status report may arrive before the last data message,
        // so keep draining until the channel closes.
        while let Some(msg) = channel.wait().await {
            match msg {
                russh::ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                russh::ChannelMsg::ExitStatus { exit_status: status } => {
                    exit_status = Some(status);
                }
                _ => {}
            }
        }

        let Some(exit_status) = exit_status else {
            return Err(Error::NoExitStatus);
        };

        let stdout = String::from_utf8_lossy(&stdout).to_string();
        tracing::debug!("Command finished with status {}", exit_status);

        if exit_status != 0 {
            return Err(Error::Command {
                command: command.to_string(),
                exit_status,
                output: stdout,
            });
        }

        Ok(CommandOutput {
            stdout,
            exit_status,
        })
    }

    pub(crate) fn handle(&self) -> &Handle<AcceptingHandler> {
        &self.handle
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.handle
            .disconnect(russh::Disconnect::ByApplication, "", "")
            .await
            .map_err(Error::Ssh)
    }
}

/// Captured result of one remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub exit_status: u32,
}

/// Host keys are accepted unconditionally. The nodes this tool provisions
/// are freshly imaged and have no stable key to pin; do not point it at
/// anything reachable from an untrusted network.
#[derive(Debug, Clone)]
pub(crate) struct AcceptingHandler;

impl Handler for AcceptingHandler {
    type Error = Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh::keys::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(true)
    }
}
