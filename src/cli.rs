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

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pideploy",
    version,
    about = "One-shot SSH deployment tool for camera client nodes",
    long_about = "pideploy provisions a single camera client node over SSH in one shot.\nIt uploads the client executable and its systemd unit file with a built-in SCP\nsender, marks the executable runnable, and reloads, enables and starts the\nservice, reporting the first failure encountered.\n\nAuthentication is username + password only and the node's host key is accepted\nwithout verification. Both are deliberate: the tool targets freshly imaged\ndevices on an isolated install subnet, not production fleets.",
    after_help = "EXAMPLES:\n  Provision node .125 with defaults:   pideploy -c 125\n  Explicit credentials:                pideploy -u admin -p secret -c 101\n  Different artifact and service:      pideploy -c 7 --artifact build/listen --service listencpp\n\nThe target address is the fixed install subnet prefix with the host\nidentifier as the last octet, e.g. '-c 125' deploys to 192.168.99.125."
)]
pub struct Cli {
    #[arg(short = 'u', long, default_value = "root", help = "Username for SSH authentication")]
    pub username: String,

    #[arg(
        short = 'p',
        long,
        default_value = "3dscan",
        help = "Password for SSH authentication (factory default of freshly imaged nodes)"
    )]
    pub password: String,

    #[arg(
        short = 'c',
        long,
        default_value = "124",
        help = "Host identifier: the last IPv4 octet of the target node on the install subnet"
    )]
    pub host_id: String,

    #[arg(
        long,
        default_value = "192.168.99.",
        help = "Install subnet prefix the host identifier is appended to"
    )]
    pub prefix: String,

    #[arg(
        long,
        default_value = "listen",
        help = "Local path of the client executable to deploy"
    )]
    pub artifact: PathBuf,

    #[arg(
        long,
        default_value = "listencpp.service",
        help = "Local path of the systemd unit file to deploy"
    )]
    pub unit_file: PathBuf,

    #[arg(
        long,
        default_value = "/camsoft",
        help = "Remote directory the executable is installed into"
    )]
    pub install_dir: String,

    #[arg(
        long,
        default_value = "/etc/systemd/system/",
        help = "Remote systemd unit directory"
    )]
    pub unit_dir: String,

    #[arg(long, default_value = "listencpp", help = "Service name to enable and start")]
    pub service: String,

    #[arg(
        long,
        default_value = "644",
        help = "Permission bits (octal) declared in the SCP transfer header"
    )]
    pub mode: String,

    #[arg(
        long,
        default_value = "0",
        help = "Timeout in seconds applied to every deployment step (0 for unlimited)"
    )]
    pub timeout: u64,

    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,
}

impl Cli {
    /// Parse the `--mode` flag as octal permission bits.
    pub fn scp_mode(&self) -> Result<u32, std::num::ParseIntError> {
        u32::from_str_radix(&self.mode, 8)
    }
}
