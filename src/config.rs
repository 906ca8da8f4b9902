//! `Config` — the process-wide, read-only-after-startup option set (spec §3,
//! §9 "Global config"). Built once from CLI flags (and an optional config
//! file) and passed explicitly into every function that needs it; nothing in
//! this crate reaches for ambient state.

use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use crate::error::CoreError;
use crate::resources::Quantity;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "node-group-autoscaler",
    about = "Sets per-ASG DesiredCapacity from live cluster demand"
)]
pub struct Cli {
    /// Optional YAML file overriding any of the defaults below.
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    #[arg(long, default_value_t = 10)]
    pub buffer_cpu_pct: u64,
    #[arg(long, default_value_t = 10)]
    pub buffer_memory_pct: u64,
    #[arg(long, default_value_t = 10)]
    pub buffer_pods_pct: u64,

    #[arg(long, default_value = "200m")]
    pub buffer_cpu_fixed: String,
    #[arg(long, default_value = "200Mi")]
    pub buffer_memory_fixed: String,
    #[arg(long, default_value_t = 10)]
    pub buffer_pods_fixed: u64,

    #[arg(long, default_value_t = 1)]
    pub buffer_spare_nodes: u64,

    #[arg(long, default_value_t = false)]
    pub include_master_nodes: bool,

    #[arg(long, default_value_t = 1)]
    pub scale_down_step_fixed: u64,
    #[arg(long, default_value_t = 0)]
    pub scale_down_step_pct: u64,

    #[arg(long, default_value_t = 60)]
    pub interval_seconds: u64,

    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Node label carrying the ASG identifier (spec §6: `<provider>/asg-name`).
    #[arg(long, default_value = "kubernetes.io/asg-name")]
    pub asg_label: String,
    /// Node label carrying the availability zone (spec §6:
    /// `topology.<provider>/zone`).
    #[arg(long, default_value = "topology.kubernetes.io/zone")]
    pub az_label: String,
    /// Node label (or taint key) identifying a master node.
    #[arg(long, default_value = "node-role.kubernetes.io/master")]
    pub master_label: String,
}

/// File-overridable subset of `Cli`, deserialized from `--config-file`.
/// Any field left unset keeps the CLI/default value.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct ConfigFile {
    pub buffer_cpu_pct: Option<u64>,
    pub buffer_memory_pct: Option<u64>,
    pub buffer_pods_pct: Option<u64>,
    pub buffer_cpu_fixed: Option<String>,
    pub buffer_memory_fixed: Option<String>,
    pub buffer_pods_fixed: Option<u64>,
    pub buffer_spare_nodes: Option<u64>,
    pub include_master_nodes: Option<bool>,
    pub scale_down_step_fixed: Option<u64>,
    pub scale_down_step_pct: Option<u64>,
    pub interval_seconds: Option<u64>,
    pub asg_label: Option<String>,
    pub az_label: Option<String>,
    pub master_label: Option<String>,
}

/// The resolved, immutable configuration passed to every decision-function
/// call (spec §3's Config table).
#[derive(Debug, Clone)]
pub struct Config {
    pub buffer_cpu_pct: u64,
    pub buffer_memory_pct: u64,
    pub buffer_pods_pct: u64,

    pub buffer_cpu_fixed: Quantity,
    pub buffer_memory_fixed: Quantity,
    pub buffer_pods_fixed: Quantity,

    pub buffer_spare_nodes: u64,

    pub include_master_nodes: bool,

    pub scale_down_step_fixed: u64,
    pub scale_down_step_pct: u64,

    pub interval_seconds: u64,
    pub once: bool,

    pub asg_label: String,
    pub az_label: String,
    pub master_label: String,
}

impl Config {
    /// Parses CLI flags and, if `--config-file` is given, layers its values
    /// on top (a config file value always wins over the corresponding CLI
    /// default, keeping precedence simple and deterministic).
    pub fn load() -> Result<Self, CoreError> {
        let cli = Cli::parse();
        Self::from_cli(cli)
    }

    pub fn from_cli(cli: Cli) -> Result<Self, CoreError> {
        let file = match &cli.config_file {
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    CoreError::Config(format!("cannot read config file {path:?}: {e}"))
                })?;
                serde_yaml::from_str::<ConfigFile>(&contents)
                    .map_err(|e| CoreError::Config(format!("invalid config file {path:?}: {e}")))?
            }
            None => ConfigFile::default(),
        };

        let buffer_cpu_fixed_raw = file.buffer_cpu_fixed.unwrap_or(cli.buffer_cpu_fixed);
        let buffer_memory_fixed_raw = file.buffer_memory_fixed.unwrap_or(cli.buffer_memory_fixed);

        Ok(Config {
            buffer_cpu_pct: file.buffer_cpu_pct.unwrap_or(cli.buffer_cpu_pct),
            buffer_memory_pct: file.buffer_memory_pct.unwrap_or(cli.buffer_memory_pct),
            buffer_pods_pct: file.buffer_pods_pct.unwrap_or(cli.buffer_pods_pct),
            buffer_cpu_fixed: Quantity::parse_cpu(&buffer_cpu_fixed_raw)?,
            buffer_memory_fixed: Quantity::parse_memory(&buffer_memory_fixed_raw)?,
            buffer_pods_fixed: Quantity::parse_pods(
                &file
                    .buffer_pods_fixed
                    .unwrap_or(cli.buffer_pods_fixed)
                    .to_string(),
            )?,
            buffer_spare_nodes: file.buffer_spare_nodes.unwrap_or(cli.buffer_spare_nodes),
            include_master_nodes: file
                .include_master_nodes
                .unwrap_or(cli.include_master_nodes),
            scale_down_step_fixed: file
                .scale_down_step_fixed
                .unwrap_or(cli.scale_down_step_fixed),
            scale_down_step_pct: file.scale_down_step_pct.unwrap_or(cli.scale_down_step_pct),
            interval_seconds: file.interval_seconds.unwrap_or(cli.interval_seconds),
            once: cli.once,
            asg_label: file.asg_label.unwrap_or(cli.asg_label),
            az_label: file.az_label.unwrap_or(cli.az_label),
            master_label: file.master_label.unwrap_or(cli.master_label),
        })
    }

    /// Defaults matching spec §3's table exactly, for use in unit/integration
    /// tests that don't go through the CLI.
    pub fn for_tests() -> Self {
        Config {
            buffer_cpu_pct: 10,
            buffer_memory_pct: 10,
            buffer_pods_pct: 10,
            buffer_cpu_fixed: Quantity::parse_cpu("200m").unwrap(),
            buffer_memory_fixed: Quantity::parse_memory("200Mi").unwrap(),
            buffer_pods_fixed: Quantity::parse_pods("10").unwrap(),
            buffer_spare_nodes: 1,
            include_master_nodes: false,
            scale_down_step_fixed: 1,
            scale_down_step_pct: 0,
            interval_seconds: 60,
            once: false,
            asg_label: "kubernetes.io/asg-name".to_string(),
            az_label: "topology.kubernetes.io/zone".to_string(),
            master_label: "node-role.kubernetes.io/master".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let cfg = Config::for_tests();
        assert_eq!(cfg.buffer_cpu_pct, 10);
        assert_eq!(cfg.buffer_cpu_fixed.units(), 200);
        assert_eq!(cfg.buffer_memory_fixed.units(), 200 * (1u64 << 20));
        assert_eq!(cfg.buffer_pods_fixed.units(), 10);
        assert_eq!(cfg.buffer_spare_nodes, 1);
        assert_eq!(cfg.scale_down_step_fixed, 1);
        assert_eq!(cfg.scale_down_step_pct, 0);
        assert_eq!(cfg.interval_seconds, 60);
    }
}
