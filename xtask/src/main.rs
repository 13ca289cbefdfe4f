// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Development tasks for the drip workspace: `cargo x <command>`.

use std::process::Command as StdCommand;

use anyhow::Context;
use anyhow::bail;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "x", about = "Development tasks for drip")]
struct Command {
    #[command(subcommand)]
    sub: SubCommand,
}

#[derive(Subcommand)]
enum SubCommand {
    /// Run rustfmt and clippy over the workspace.
    Lint {
        /// Rewrite files instead of checking formatting.
        #[arg(long)]
        fix: bool,
    },
    /// Run the unit, integration and doc tests.
    Test {
        /// Run tests without capturing their output.
        #[arg(long)]
        no_capture: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cmd = Command::parse();
    let steps = match cmd.sub {
        SubCommand::Lint { fix } => lint_steps(fix),
        SubCommand::Test { no_capture } => test_steps(no_capture),
    };
    for args in steps {
        run_cargo(&args)?;
    }
    Ok(())
}

fn lint_steps(fix: bool) -> Vec<Vec<&'static str>> {
    let fmt = if fix {
        vec!["fmt", "--all"]
    } else {
        vec!["fmt", "--all", "--check"]
    };
    let clippy = vec![
        "clippy",
        "--workspace",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ];
    vec![fmt, clippy]
}

fn test_steps(no_capture: bool) -> Vec<Vec<&'static str>> {
    let mut test = vec!["test", "--workspace", "--all-features"];
    if no_capture {
        test.extend(["--", "--nocapture"]);
    }
    vec![test]
}

fn run_cargo(args: &[&str]) -> anyhow::Result<()> {
    let cargo = which::which("cargo").context("cargo not found")?;
    let line = args.join(" ");
    println!("$ cargo {line}");
    let status = StdCommand::new(cargo)
        .args(args)
        .status()
        .with_context(|| format!("failed to run cargo {line}"))?;
    if !status.success() {
        bail!("cargo {line} failed with {status}");
    }
    Ok(())
}
