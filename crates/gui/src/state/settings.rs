//! Application settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Room dimensions in meters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSettings {
    /// Extent along world X
    pub width: f32,
    /// Extent along world Z
    pub depth: f32,
    pub wall_height: f32,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            width: 8.0,
            depth: 8.0,
            wall_height: 2.5,
        }
    }
}

/// Initial camera placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    /// Distance from the room center
    pub distance: f32,
    /// Vertical field of view
    pub fov_degrees: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            yaw_degrees: 20.0,
            pitch_degrees: 55.0,
            distance: 14.0,
            fov_degrees: 45.0,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Selection color RGB
    pub selection_color: [u8; 3],
    /// Floor color RGB
    pub floor_color: [u8; 3],
    /// Wall color RGB
    pub wall_color: [u8; 3],
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [30, 30, 35],
            selection_color: [0, 220, 255],
            floor_color: [168, 140, 110],
            wall_color: [210, 210, 200],
        }
    }
}

/// Where furniture models come from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetSettings {
    /// Directory with model files; built-in procedural models when unset
    #[serde(default)]
    pub model_dir: Option<PathBuf>,
}

/// All application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Room geometry
    pub room: RoomSettings,
    /// Camera defaults
    pub camera: CameraSettings,
    /// Viewport colors
    pub viewport: ViewportSettings,
    /// Model source
    #[serde(default)]
    pub assets: AssetSettings,
}

/// 8-bit RGB → linear-ish float color used by meshes
pub fn rgb_to_f32(rgb: [u8; 3]) -> [f32; 3] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ]
}

impl PlannerSettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "roomplan", "roomplan") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => {
                        tracing::warn!("Ignoring malformed settings {}: {e}", config_path.display())
                    }
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "roomplan", "roomplan") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    if let Err(e) = std::fs::write(&config_path, json) {
                        tracing::warn!("Failed to save settings to {}: {e}", config_path.display());
                    }
                }
            }
        }
    }
}
