//! `armctl` – robotic arm controller command line interface.
//!
//! Loads the configuration, then runs one full control session (calibrate,
//! steady state, park) against the simulated arm.  Ctrl-C and the back
//! button both end the session through the same shutdown register.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use armctl_hal::{Button, SimArm};
use armctl_runtime::ArmSession;
use armctl_runtime::telemetry::init_tracing;
use clap::Parser;
use colored::Colorize;
use tracing::{error, info, warn};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "armctl")]
#[command(about = "Real-time controller for a three-motor robotic arm")]
struct Args {
    /// Config file (default `~/.armctl/config.toml`)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Press the back button after this many seconds
    #[arg(long, value_name = "SECS")]
    run_for: Option<f64>,

    /// Run every task under the normal scheduler
    #[arg(long)]
    no_realtime: bool,

    /// Write the default configuration to the config path and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    print_banner();
    init_tracing("armctl");

    let path = args.config.clone().unwrap_or_else(config::config_path);

    if args.init_config {
        return match config::save_to(&armctl_types::ArmConfig::default(), &path) {
            Ok(()) => {
                println!(
                    "  {} Default config written to {}",
                    "✓".green().bold(),
                    path.display().to_string().bold()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                println!("{}: {}", "Error saving config".red(), e);
                ExitCode::FAILURE
            }
        };
    }

    let mut cfg = match config::load_or_default(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            return ExitCode::FAILURE;
        }
    };
    if args.no_realtime {
        cfg.scheduling.realtime = false;
    }
    info!(path = %path.display(), realtime = cfg.scheduling.realtime, "configuration loaded");

    let session = ArmSession::new(cfg);

    let state = session.state();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – parking the arm …".yellow().bold());
        state.request_shutdown();
    }) {
        warn!(error = %e, "failed to install Ctrl-C handler; use the back button to stop");
    }

    let (hardware, handles) = SimArm::builder().build();

    if let Some(secs) = args.run_for {
        match Duration::try_from_secs_f64(secs) {
            Ok(after) => {
                let handles = handles.clone();
                thread::spawn(move || {
                    thread::sleep(after);
                    info!(after_secs = secs, "run time elapsed, pressing back");
                    handles.press(Button::Back);
                });
            }
            Err(_) => warn!(secs, "ignoring invalid --run-for"),
        }
    }

    println!("  Press {} to stop.\n", "Ctrl-C".bold().cyan());

    match session.run(hardware) {
        Ok(()) => {
            println!("\n  {} Arm parked. Goodbye.", "✓".green().bold());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "session failed");
            println!("\n  {}: {}", "Session failed".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn print_banner() {
    println!();
    println!("{}", r#"   ___   ___  __  ___________  __ "#.bold().cyan());
    println!("{}", r#"  / _ | / _ \/  |/  / ___/_  _/ / "#.bold().cyan());
    println!("{}", r#" / __ |/ , _/ /|_/ / /__  / // /__"#.bold().cyan());
    println!("{}", r#"/_/ |_/_/|_/_/  /_/\___/ /_//____/"#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "armctl".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Robotic arm controller");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let args = Args::try_parse_from([
            "armctl",
            "--config",
            "/tmp/arm.toml",
            "--run-for",
            "2.5",
            "--no-realtime",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/arm.toml")));
        assert_eq!(args.run_for, Some(2.5));
        assert!(args.no_realtime);
        assert!(!args.init_config);
    }

    #[test]
    fn defaults_to_realtime_and_no_deadline() {
        let args = Args::try_parse_from(["armctl"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.run_for.is_none());
        assert!(!args.no_realtime);
    }
}
