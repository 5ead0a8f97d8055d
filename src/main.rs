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

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;

use pideploy::{
    cli::Cli,
    config::{Credentials, DeployConfig},
    deploy::{plan::DeploymentPlan, Deployer},
    target::Target,
    utils::init_logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = DeployConfig::from_cli(&cli)?;
    let target = Target::from_host_id(&cli.prefix, &cli.host_id);
    let credentials = Credentials::new(cli.username.clone(), cli.password.clone());

    println!(
        "{} Deploying {} to {}\n",
        "▶".cyan(),
        config.service.bold(),
        target.to_string().bold()
    );

    let plan = DeploymentPlan::standard(&config);
    let deployer = Deployer::new(target, credentials).with_timeout(config.timeout_secs);

    match deployer.run(&plan).await {
        Ok(report) => {
            if !report.status_text.is_empty() {
                println!("\n{}", report.status_text.trim_end());
            }
            println!(
                "\n{} {} ({} of {} steps)",
                "●".green(),
                "service installed and started".green(),
                report.completed,
                plan.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("\n{} {}", "●".red(), "deployment failed".red());
            let chain = format!("{:#}", anyhow::Error::new(e));
            for (i, line) in chain.lines().enumerate() {
                if i == 0 {
                    eprintln!("  {} {}", "└".dimmed(), line.dimmed());
                } else {
                    eprintln!("    {}", line.dimmed());
                }
            }
            std::process::exit(1);
        }
    }
}
