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

//! SSH substrate: connection factory, remote command runner and the SCP
//! sink encoder, built on russh.
//!
//! One [`Client`] is opened per deployment step and carries exactly one
//! exec channel per operation; nothing is pooled or shared across steps.

pub mod client;
pub mod error;
pub mod scp;

pub use client::{Client, CommandOutput};
pub use error::Error;
