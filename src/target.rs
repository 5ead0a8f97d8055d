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

use std::fmt;

/// The node a deployment run talks to. Resolved once per run and immutable
/// afterwards; SSH always goes to port 22.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl Target {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
        }
    }

    /// Build the target address from the install subnet prefix and the host
    /// identifier, e.g. `"192.168.99."` + `"125"` -> `192.168.99.125`.
    pub fn from_host_id(prefix: &str, host_id: &str) -> Self {
        Self::new(format!("{prefix}{host_id}"))
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_host_id() {
        let target = Target::from_host_id("192.168.99.", "125");
        assert_eq!(target.host, "192.168.99.125");
        assert_eq!(target.port, 22);
    }

    #[test]
    fn test_address() {
        let target = Target::new("192.168.99.124");
        assert_eq!(target.address(), "192.168.99.124:22");
    }

    #[test]
    fn test_display() {
        let target = Target::from_host_id("10.0.0.", "7");
        assert_eq!(target.to_string(), "10.0.0.7:22");
    }
}
