use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Folder holding the uploaded images; frame identifiers resolve against it.
    pub images_folder: PathBuf,
    /// Sentinel image that always sits at the head of the rotation.
    pub default_image: String,
    /// Directory containing `index.html`, the bootstrap stylesheet and `logo.png`.
    pub asset_dir: PathBuf,
    /// Address the control surface listens on.
    pub bind_address: SocketAddr,
    /// Time each picture stays on screen before the next one is shown.
    #[serde(with = "humantime_serde")]
    pub delay: Duration,
    /// Bounded capacity of the slideshow -> viewer channel.
    pub channel_capacity: usize,
    /// Commands run for the restart and shutdown actions.
    pub power: PowerOptions,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            !self.default_image.trim().is_empty(),
            "default-image must not be empty"
        );
        ensure!(
            !self.default_image.contains(['/', '\\']),
            "default-image must be a bare file name"
        );
        ensure!(self.delay > Duration::ZERO, "delay must be greater than zero");
        ensure!(
            self.channel_capacity > 0,
            "channel-capacity must be greater than zero"
        );
        self.power.validate()?;
        Ok(self)
    }

    pub fn index_html_path(&self) -> PathBuf {
        self.asset_dir.join("index.html")
    }

    pub fn stylesheet_path(&self) -> PathBuf {
        self.asset_dir
            .join("node_modules/bootstrap/dist/css/bootstrap.min.css")
    }

    pub fn logo_path(&self) -> PathBuf {
        self.asset_dir.join("logo.png")
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            images_folder: PathBuf::from("./img"),
            default_image: "flair.png".to_string(),
            asset_dir: PathBuf::from("."),
            bind_address: SocketAddr::from(([0, 0, 0, 0], 5000)),
            delay: Duration::from_millis(5000),
            channel_capacity: 4,
            power: PowerOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PowerOptions {
    /// Program and arguments run for `/system/restart`.
    pub restart_command: Vec<String>,
    /// Program and arguments run for `/system/shutdown`.
    pub shutdown_command: Vec<String>,
}

impl PowerOptions {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.restart_command.first().is_some_and(|p| !p.is_empty()),
            "power.restart-command must name a program"
        );
        ensure!(
            self.shutdown_command.first().is_some_and(|p| !p.is_empty()),
            "power.shutdown-command must name a program"
        );
        Ok(())
    }
}

impl Default for PowerOptions {
    fn default() -> Self {
        Self {
            restart_command: vec!["sudo".into(), "reboot".into()],
            shutdown_command: vec!["sudo".into(), "shutdown".into()],
        }
    }
}
