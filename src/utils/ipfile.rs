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

//! Helpers for network interface files on the nodes: pull the first IPv4
//! address out of a file, or rewrite one address to another in place.
//! Standalone utilities; the deployment pipeline itself does not read or
//! rewrite interface files.

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::path::Path;

const IPV4_PATTERN: &str = r"\b(?:\d{1,3}\.){3}\d{1,3}\b";

/// Return the first IPv4 literal found in the file.
pub fn extract_first_ipv4(path: &Path) -> Result<String> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {path:?}"))?;

    let re = Regex::new(IPV4_PATTERN).expect("static pattern");
    match re.find(&data) {
        Some(m) => Ok(m.as_str().to_string()),
        None => bail!("no IP address found in {path:?}"),
    }
}

/// Replace every occurrence of `old_ip` with `new_ip` in the file,
/// rewriting it in place. The rest of the file is left untouched.
pub fn replace_ip_in_file(path: &Path, old_ip: &str, new_ip: &str) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {path:?}"))?;

    let updated = content.replace(old_ip, new_ip);

    std::fs::write(path, updated).with_context(|| format!("failed to write {path:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_first_ipv4() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interfaces");
        std::fs::write(&path, "address 192.168.99.124\ngateway 192.168.99.1\n").unwrap();

        assert_eq!(extract_first_ipv4(&path).unwrap(), "192.168.99.124");
    }

    #[test]
    fn test_extract_without_address_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interfaces");
        std::fs::write(&path, "iface eth0 inet dhcp\n").unwrap();

        assert!(extract_first_ipv4(&path).is_err());
    }

    #[test]
    fn test_replace_ip_preserves_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interfaces");
        std::fs::write(
            &path,
            "iface eth0 inet static\naddress 192.168.99.124\nnetmask 255.255.255.0\n",
        )
        .unwrap();

        replace_ip_in_file(&path, "192.168.99.124", "192.168.99.125").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "iface eth0 inet static\naddress 192.168.99.125\nnetmask 255.255.255.0\n"
        );
    }

    #[test]
    fn test_replace_all_occurrences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts");
        std::fs::write(&path, "10.0.0.5 cam\n10.0.0.5 cam.local\n").unwrap();

        replace_ip_in_file(&path, "10.0.0.5", "10.0.0.9").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "10.0.0.9 cam\n10.0.0.9 cam.local\n");
    }
}
