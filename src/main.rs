use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use node_group_autoscaler::config::{Cli, Config};
use node_group_autoscaler::driver::Driver;
use node_group_autoscaler::providers::file::{FileCloud, FileOrchestrator};

/// Extra CLI surface beyond `Config`: where to read the cluster/ASG
/// snapshot from. The real orchestrator/cloud clients are out of scope for
/// this crate (spec §1) — this flag exists so the binary is runnable
/// end-to-end against a captured snapshot file.
#[derive(Parser, Debug)]
struct Args {
    #[command(flatten)]
    cli: Cli,

    /// YAML file describing nodes, pods, and ASGs (see `demos/snapshot.yaml`).
    #[arg(long)]
    snapshot: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let config = match Config::from_cli(args.cli) {
        Ok(config) => config,
        Err(err) => {
            log::error!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let orchestrator = FileOrchestrator {
        snapshot_path: args.snapshot.clone(),
    };
    let cloud = FileCloud {
        snapshot_path: args.snapshot,
    };

    let once = config.once;
    let mut driver = Driver::new(&orchestrator, &cloud, config);

    if once {
        if let Err(err) = driver.run_once() {
            log::error!("unrecoverable snapshot failure: {err}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    match driver.run_forever() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("fatal error: {err}");
            ExitCode::FAILURE
        }
    }
}
