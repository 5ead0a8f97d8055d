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

use pideploy::config::{Credentials, DeployConfig};
use pideploy::deploy::{plan::DeploymentPlan, Deployer};
use pideploy::ssh::Error;
use pideploy::target::Target;

fn unroutable_deployer() -> Deployer {
    // A name under the reserved .invalid TLD never resolves, so no
    // connection is ever made.
    let target = Target::new("this.host.does.not.exist.invalid");
    let credentials = Credentials::new("root", "3dscan");
    Deployer::new(target, credentials)
}

#[tokio::test]
async fn test_missing_artifact_fails_before_connecting() {
    let config = DeployConfig {
        artifact: "/this/artifact/does/not/exist".into(),
        ..DeployConfig::default()
    };
    let plan = DeploymentPlan::standard(&config);

    // The local stat must fail the step before any connection attempt:
    // with an unroutable target, a connect-first implementation would
    // report a connection error instead.
    let err = unroutable_deployer().run(&plan).await.unwrap_err();
    assert_eq!(err.step, 1);
    assert_eq!(err.completed, 0);
    assert!(matches!(err.source, Error::LocalIo { .. }));
}

#[tokio::test]
async fn test_unreachable_host_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("listen");
    std::fs::write(&artifact, b"payload").unwrap();

    let config = DeployConfig {
        artifact: artifact.clone(),
        unit_file: artifact,
        ..DeployConfig::default()
    };
    let plan = DeploymentPlan::standard(&config);

    let err = unroutable_deployer().run(&plan).await.unwrap_err();
    assert_eq!(err.step, 1);
    assert_eq!(err.completed, 0);
    assert!(matches!(err.source, Error::Connection { .. }));
}

#[tokio::test]
async fn test_first_failure_aborts_remaining_plan() {
    // All four steps would fail against the unroutable target; only the
    // first is ever attempted and reported.
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("listen");
    std::fs::write(&artifact, b"payload").unwrap();

    let config = DeployConfig {
        artifact: artifact.clone(),
        unit_file: artifact,
        ..DeployConfig::default()
    };
    let plan = DeploymentPlan::standard(&config);

    let err = unroutable_deployer().run(&plan).await.unwrap_err();
    assert_eq!(err.step, 1);
    assert_eq!(err.label, "install executable");
    assert_eq!(err.completed, 0);
}
