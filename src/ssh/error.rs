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

//! Error taxonomy for remote operations.
//!
//! Every deployment step resolves to exactly one of these; the
//! orchestrator aborts the remaining plan on the first failure and the
//! error is surfaced as a value, never by terminating the process from
//! inside an operation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Could not reach or handshake with the target.
    #[error("failed to connect to {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: russh::Error,
    },

    /// The target rejected the username/password pair.
    #[error("authentication failed for user '{username}'")]
    Authentication { username: String },

    /// A local artifact could not be read.
    #[error("cannot read local file {path:?}: {source}")]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote scp sink rejected or aborted the stream.
    #[error("remote scp sink rejected transfer of '{filename}' (exit status {exit_status})")]
    Transfer { filename: String, exit_status: u32 },

    /// A remote command exited non-zero.
    #[error("command '{command}' exited with status {exit_status}")]
    Command {
        command: String,
        exit_status: u32,
        /// Captured stdout of the failed command. stderr is not captured
        /// separately; redirect with `2>&1` if it matters.
        output: String,
    },

    /// The channel closed without the remote side reporting an exit status.
    #[error("channel closed before the remote command reported an exit status")]
    NoExitStatus,

    /// The SCP writer task failed to run to completion.
    #[error("scp writer task failed: {0}")]
    WriterJoin(#[from] tokio::task::JoinError),

    /// A step exceeded the configured uniform timeout.
    #[error("operation timed out after {0} seconds")]
    Timeout(u64),

    /// Any other protocol-level failure from the SSH layer.
    #[error("ssh protocol error: {0}")]
    Ssh(#[from] russh::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
