//! Configuration for pens, avatar naming and the relay server

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{PenboardError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PenboardConfig {
    #[serde(default)]
    pub pen: PenConfig,

    #[serde(default)]
    pub avatar: AvatarConfig,

    #[serde(default)]
    pub relay: RelayConfig,
}

/// Pen sampling and brush defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenConfig {
    /// Material name prefix a surface must carry to be paintable
    #[serde(default = "default_target_material")]
    pub target_material: String,

    /// Max distance of the ray cast from the nib
    #[serde(default = "default_nib_distance")]
    pub nib_max_distance: f32,

    /// Max distance of the ray cast from the eraser
    #[serde(default = "default_eraser_distance")]
    pub eraser_max_distance: f32,

    /// Initial brush diameter in pixels
    #[serde(default = "default_brush_size")]
    pub brush_size: f32,

    /// Initial brush color (RGB, 0..1)
    #[serde(default = "default_brush_color")]
    pub brush_color: [f32; 3],
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            target_material: default_target_material(),
            nib_max_distance: default_nib_distance(),
            eraser_max_distance: default_eraser_distance(),
            brush_size: default_brush_size(),
            brush_color: default_brush_color(),
        }
    }
}

fn default_target_material() -> String {
    "Mat_Drawing".to_string()
}

fn default_nib_distance() -> f32 {
    0.2
}

fn default_eraser_distance() -> f32 {
    1.0
}

fn default_brush_size() -> f32 {
    75.0
}

fn default_brush_color() -> [f32; 3] {
    [0.5, 0.5, 0.5]
}

/// Naming convention for the local and remote avatar roots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    #[serde(default = "default_mine_prefix")]
    pub mine_prefix: String,

    #[serde(default = "default_remote_prefix")]
    pub remote_prefix: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            mine_prefix: default_mine_prefix(),
            remote_prefix: default_remote_prefix(),
        }
    }
}

fn default_mine_prefix() -> String {
    "My Avatar #".to_string()
}

fn default_remote_prefix() -> String {
    "Remote Avatar #".to_string()
}

/// Relay server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,

    /// Maximum number of peers in the room
    #[serde(default = "default_max_peers")]
    pub max_peers: usize,

    /// Interval between buffered flushes, in milliseconds
    #[serde(default = "default_flush_interval")]
    pub flush_interval_ms: u64,

    /// Number of non-transform messages kept for late joiners
    #[serde(default = "default_replay_limit")]
    pub replay_limit: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            max_peers: default_max_peers(),
            flush_interval_ms: default_flush_interval(),
            replay_limit: default_replay_limit(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_max_peers() -> usize {
    100
}

fn default_flush_interval() -> u64 {
    30
}

fn default_replay_limit() -> usize {
    4096
}

impl PenboardConfig {
    /// Load configuration from a TOML file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PenboardError::ConfigNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn load_str(content: &str) -> Result<Self> {
        let config: PenboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let pen = &self.pen;

        if pen.target_material.is_empty() {
            return Err(PenboardError::ConfigInvalid(
                "pen.target_material must not be empty".into(),
            ));
        }

        for (name, distance) in [
            ("nib_max_distance", pen.nib_max_distance),
            ("eraser_max_distance", pen.eraser_max_distance),
        ] {
            if !distance.is_finite() || distance <= 0.0 {
                return Err(PenboardError::ConfigInvalid(format!(
                    "pen.{} must be positive, got {}",
                    name, distance
                )));
            }
        }

        if !pen.brush_size.is_finite() || pen.brush_size < 0.0 {
            return Err(PenboardError::ConfigInvalid(format!(
                "pen.brush_size out of range: {}",
                pen.brush_size
            )));
        }

        if self.avatar.mine_prefix.is_empty()
            || self.avatar.remote_prefix.is_empty()
            || self.avatar.mine_prefix == self.avatar.remote_prefix
        {
            return Err(PenboardError::ConfigInvalid(
                "avatar prefixes must be non-empty and distinct".into(),
            ));
        }

        if self.relay.max_peers == 0 {
            return Err(PenboardError::ConfigInvalid(
                "relay.max_peers must be at least 1".into(),
            ));
        }

        if self.relay.flush_interval_ms == 0 {
            return Err(PenboardError::ConfigInvalid(
                "relay.flush_interval_ms must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
