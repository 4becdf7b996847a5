use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum AlertOutput {
    /// BEL to stdout plus a log line.
    #[default]
    #[serde(alias = "terminal", alias = "Console")]
    Terminal,
    /// JSON alert events over UDP.
    #[serde(alias = "udp", alias = "GenericUDP")]
    Udp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Capture input index handed to the active module.
    pub index: u32,
    /// Camera cycling probes indices modulo this bound.
    pub probe_limit: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            probe_limit: 5,
        }
    }
}

/// Gaze-ratio thresholds. The ratio is iris offset over eye width, so
/// ordering extreme_left < left < right < extreme_right is assumed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GazeThresholds {
    pub extreme_left: f32,
    pub left: f32,
    pub right: f32,
    pub extreme_right: f32,
}

impl Default for GazeThresholds {
    fn default() -> Self {
        Self {
            extreme_left: 0.25,
            left: 0.35,
            right: 0.65,
            extreme_right: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Nose-tip delta (normalized units) above which head movement is
    /// considered excessive.
    pub movement_threshold: f32,
    /// Lid gap over eye width below which an eye counts as closed.
    pub eye_open_threshold: f32,
    /// 0.0 disables smoothing; towards 1.0 smooths harder.
    pub smoothness: f32,
    /// Continuous eyes-closed time before the alert escalates to Critical.
    pub escalate_after_secs: f32,
    pub gaze: GazeThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            movement_threshold: 0.008,
            eye_open_threshold: 0.18,
            smoothness: 0.0,
            escalate_after_secs: 3.0,
            gaze: GazeThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertConfig {
    #[serde(alias = "transport_type")]
    pub output_mode: AlertOutput,
    pub send_address: String,
    pub send_port: u16,
    /// Minimum seconds between two alerts of the same level.
    pub cooldown_secs: f32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            output_mode: AlertOutput::default(),
            send_address: "127.0.0.1".to_string(),
            send_port: 9100,
            cooldown_secs: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModuleConfig {
    /// File name of the active plugin in plugins/native.
    pub active: String,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            active: "mesh_udp_module.dll".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    /// 0 lets the OS pick a port.
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { port: 0 }
    }
}

fn default_max_fps() -> Option<f32> {
    Some(30.0)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub camera: CameraConfig,
    pub analysis: AnalysisConfig,
    pub alert: AlertConfig,
    pub module: ModuleConfig,
    pub http: HttpConfig,
    /// Frame pacing cap. `null` in the file disables pacing.
    #[serde(default = "default_max_fps")]
    pub max_fps: Option<f32>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            analysis: AnalysisConfig::default(),
            alert: AlertConfig::default(),
            module: ModuleConfig::default(),
            http: HttpConfig::default(),
            max_fps: default_max_fps(),
        }
    }
}

impl MonitorConfig {
    /// Reads the config file, or writes a default one when it is missing.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading config from {:?}", path);
            let file = fs::File::open(path)
                .with_context(|| format!("Failed to open config at {:?}", path))?;
            let reader = std::io::BufReader::new(file);
            let config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config at {:?}", path))?;
            Ok(config)
        } else {
            info!("Config not found. Creating default at {:?}", path);
            let config = Self::default();
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create config at {:?}", path))?;
            let writer = std::io::BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &config).context("Failed to write config")?;
            Ok(config)
        }
    }
}
