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

//! Minimal sender side of the SCP sink protocol.
//!
//! The remote end is started as `scp -t <dir>` and then fed, over the exec
//! channel's stdin: one control line `C<mode> <size> <filename>\n`, the raw
//! file bytes, and a single `0x00` terminator. The sink blocks reading that
//! stream for as long as the command appears to be running, so the writes
//! run on their own task while the caller waits for the exit status.

use std::io;
use std::path::{Path, PathBuf};

use super::client::Client;
use super::error::{Error, Result};

/// One file transfer, resolved against the local filesystem.
///
/// Construction stats the local file, so a missing artifact fails here,
/// before any remote channel is opened for the step.
#[derive(Debug, Clone)]
pub struct TransferSpec {
    pub local: PathBuf,
    pub remote_dir: String,
    /// Remote filename, inferred from the last component of `local`.
    pub filename: String,
    /// Byte length declared in the control header.
    pub len: u64,
    /// Permission bits declared in the control header. The remote file gets
    /// these bits regardless of the local file's actual mode.
    pub mode: u32,
}

impl TransferSpec {
    pub fn stat(local: &Path, remote_dir: &str, mode: u32) -> Result<Self> {
        let metadata = std::fs::metadata(local).map_err(|source| Error::LocalIo {
            path: local.to_path_buf(),
            source,
        })?;
        let filename = local
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::LocalIo {
                path: local.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            })?;
        Ok(Self {
            local: local.to_path_buf(),
            remote_dir: remote_dir.to_string(),
            filename,
            len: metadata.len(),
            mode,
        })
    }
}

/// Control line announcing one file to the sink. Mode is rendered as four
/// octal digits; the declared size must equal the payload length exactly.
pub fn sink_header(mode: u32, len: u64, filename: &str) -> String {
    format!("C{mode:04o} {len} {filename}\n")
}

/// Send one file to `scp -t <remote_dir>` over a fresh exec channel.
///
/// The header, payload and terminator are written by an auxiliary task
/// while this task drains channel messages until the remote command
/// finishes; the writer is joined before the outcome is reported, so a
/// success return means the full payload and terminator went out and the
/// stream was closed.
pub async fn send_file(client: &Client, spec: &TransferSpec) -> Result<()> {
    let file = tokio::fs::File::open(&spec.local)
        .await
        .map_err(|source| Error::LocalIo {
            path: spec.local.clone(),
            source,
        })?;

    tracing::debug!(
        "Transferring {:?} ({} bytes) to {}",
        spec.local,
        spec.len,
        spec.remote_dir
    );

    let command = format!("scp -t {}", spec.remote_dir);
    let channel = client.handle().channel_open_session().await?;
    channel.exec(true, command.as_str()).await?;

    let (mut read_half, write_half) = channel.split();
    let header = sink_header(spec.mode, spec.len, &spec.filename);

    let writer = tokio::spawn(async move {
        write_half.data(header.as_bytes()).await?;
        write_half.data(file).await?;
        write_half.data(&b"\x00"[..]).await?;
        write_half.eof().await?;
        Ok::<(), russh::Error>(())
    });

    // The sink acks each protocol message with a data byte; those are
    // drained here along with everything else until the channel closes.
    let mut exit_status: Option<u32> = None;
    while let Some(msg) = read_half.wait().await {
        if let russh::ChannelMsg::ExitStatus { exit_status: status } = msg {
            exit_status = Some(status);
        }
    }

    writer.await??;

    match exit_status {
        Some(0) => Ok(()),
        Some(status) => Err(Error::Transfer {
            filename: spec.filename.clone(),
            exit_status: status,
        }),
        None => Err(Error::NoExitStatus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_header_format() {
        assert_eq!(sink_header(0o644, 1234, "listen"), "C0644 1234 listen\n");
    }

    #[test]
    fn test_sink_header_zero_length() {
        // Zero-length files are valid: size 0, no payload, terminator only.
        assert_eq!(
            sink_header(0o644, 0, "listencpp.service"),
            "C0644 0 listencpp.service\n"
        );
    }

    #[test]
    fn test_sink_header_mode_rendering() {
        assert_eq!(sink_header(0o755, 9, "a"), "C0755 9 a\n");
        assert_eq!(sink_header(0o7, 9, "a"), "C0007 9 a\n");
    }

    #[test]
    fn test_stat_declares_actual_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listen");
        std::fs::write(&path, b"binary payload").unwrap();

        let spec = TransferSpec::stat(&path, "/camsoft", 0o644).unwrap();
        assert_eq!(spec.len, 14);
        assert_eq!(spec.filename, "listen");
        assert_eq!(spec.remote_dir, "/camsoft");
    }

    #[test]
    fn test_stat_missing_file_is_local_io() {
        let err = TransferSpec::stat(Path::new("/no/such/artifact"), "/camsoft", 0o644)
            .unwrap_err();
        assert!(matches!(err, Error::LocalIo { .. }));
    }

    #[test]
    fn test_stat_infers_basename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("listencpp.service");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"").unwrap();

        let spec = TransferSpec::stat(&path, "/etc/systemd/system/", 0o644).unwrap();
        assert_eq!(spec.filename, "listencpp.service");
        assert_eq!(spec.len, 0);
    }
}
