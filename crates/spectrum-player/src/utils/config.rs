//! Configuration file management.
//!
//! Loads tuning values from `~/.spectrum-player.toml`. The file is created
//! from a commented template on first run and is never written afterwards.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_FFT_SIZE: usize = 1024;
const DEFAULT_SAMPLE_RATIO: f32 = 4.0 / 6.0;
const DEFAULT_TRACK_ADVANCE_DELAY_MS: u64 = 500;
const DEFAULT_ROTATION_INTERVAL_MS: u64 = 50;
const DEFAULT_DEVICE_TIMEOUT_SECS: u64 = 3;

const MIN_FFT_SIZE: usize = 32;
const MAX_FFT_SIZE: usize = 32768;

const CONFIG_TEMPLATE: &str = r#"# spectrum-player configuration file

# Analysis window size in samples, power of two between 32 and 32768 (default: 1024)
# fft_size = 1024

# Fraction of frequency bins to draw, in (0, 1] (default: 0.6667)
# The highest bins are dropped first.
# sample_ratio = 0.6667

# Pause between the end of one track and the start of the next (default: 500)
# track_advance_delay_ms = 500

# Arc style rotation step interval (default: 50)
# rotation_interval_ms = 50

# Output device, matched case-insensitively against device names
# output_device = "pipewire"

# Timeout in seconds when querying the output device (default: 3)
# device_timeout_secs = 3
"#;

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct Config {
    pub fft_size: Option<usize>,
    pub sample_ratio: Option<f32>,
    pub track_advance_delay_ms: Option<u64>,
    pub rotation_interval_ms: Option<u64>,
    pub output_device: Option<String>,
    pub device_timeout_secs: Option<u64>,
}

impl Config {
    fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".spectrum-player.toml"))
    }

    pub fn load() -> Self {
        let path = match Self::path() {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            match fs::write(&path, CONFIG_TEMPLATE) {
                Ok(()) => info!("Created config template at {:?}", path),
                Err(e) => warn!("Could not create config template at {:?}: {}", path, e),
            }
        }

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                warn!("Could not read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Self {
        toml::from_str(content).unwrap_or_else(|e| {
            warn!("Invalid config, using defaults: {}", e);
            Self::default()
        })
    }

    pub fn fft_size(&self) -> usize {
        match self.fft_size {
            Some(size)
                if size.is_power_of_two() && (MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&size) =>
            {
                size
            }
            Some(size) => {
                warn!(
                    "fft_size {} must be a power of two in {}..={}, using {}",
                    size, MIN_FFT_SIZE, MAX_FFT_SIZE, DEFAULT_FFT_SIZE
                );
                DEFAULT_FFT_SIZE
            }
            None => DEFAULT_FFT_SIZE,
        }
    }

    pub fn sample_ratio(&self) -> f32 {
        match self.sample_ratio {
            Some(ratio) if ratio > 0.0 && ratio <= 1.0 => ratio,
            Some(ratio) => {
                warn!("sample_ratio {} outside (0, 1], using default", ratio);
                DEFAULT_SAMPLE_RATIO
            }
            None => DEFAULT_SAMPLE_RATIO,
        }
    }

    pub fn track_advance_delay(&self) -> Duration {
        Duration::from_millis(
            self.track_advance_delay_ms
                .unwrap_or(DEFAULT_TRACK_ADVANCE_DELAY_MS),
        )
    }

    pub fn rotation_interval(&self) -> Duration {
        match self.rotation_interval_ms {
            Some(0) => {
                warn!("rotation_interval_ms must be positive, using default");
                Duration::from_millis(DEFAULT_ROTATION_INTERVAL_MS)
            }
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_millis(DEFAULT_ROTATION_INTERVAL_MS),
        }
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(
            self.device_timeout_secs
                .unwrap_or(DEFAULT_DEVICE_TIMEOUT_SECS),
        )
    }
}
