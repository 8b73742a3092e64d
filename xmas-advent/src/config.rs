//! This module contains the [`SceneConfig`], which is stored as RON.

use crate::{today, AdventError, AdventState, Calendar};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};
use tracing::{debug, instrument, warn};
use tracing_unwrap::ResultExt;
use xmas_snowfall::SnowfallConfig;

/// An RGB colour.
pub type RGBArray = [u8; 3];

/// Where the decoration for one day hangs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecorationPlacement {
    /// The day of the month that this decoration opens on.
    pub day: u32,

    /// The position of the decoration.
    pub position: Vec3,
}

/// The asset paths of everything the scene loads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// The Christmas tree scene.
    pub tree: String,

    /// The scene that every decoration is cloned from.
    pub decoration: String,

    /// The scene that every snowflake is cloned from.
    pub snowflake: String,

    /// The font used by all the UI text.
    pub font: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            tree: "models/christmas_tree.glb#Scene0".to_string(),
            decoration: "models/christmas_deko.glb#Scene0".to_string(),
            snowflake: "models/snowflake.glb#Scene0".to_string(),
            font: "fonts/FiraSans-Bold.ttf".to_string(),
        }
    }
}

/// The orbit camera.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Where the camera starts.
    pub position: Vec3,

    /// The point the camera orbits around.
    pub target: Vec3,

    /// The vertical field of view in degrees.
    pub fov_degrees: f32,

    /// How fast dragging the mouse rotates the camera.
    pub rotate_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(50., 40., 50.),
            target: Vec3::ZERO,
            fov_degrees: 50.,
            rotate_sensitivity: 0.25,
        }
    }
}

/// The sky and the lights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// The linear RGB colour of the sky.
    pub sky_colour: [f32; 3],

    /// Where the sun is. It shines towards the origin.
    pub sun_position: Vec3,

    /// The illuminance of the sun in lux.
    pub sun_illuminance: f32,

    /// The brightness of the ambient light.
    pub ambient_brightness: f32,

    /// The position of the point light.
    pub point_light_position: Vec3,

    /// The intensity of the point light in lumens.
    pub point_light_intensity: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            sky_colour: [0.45, 0.62, 0.85],
            sun_position: Vec3::new(200., 20., 100.),
            sun_illuminance: 10_000.,
            ambient_brightness: 0.8,
            point_light_position: Vec3::new(10., 10., 10.),
            point_light_intensity: 3_000.,
        }
    }
}

/// The screen shown before the scene starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartScreenConfig {
    /// The text on the start button.
    pub button_label: String,

    /// The text under the start button.
    pub caption: String,

    /// The colour of the button and the caption.
    pub colour: RGBArray,
}

impl Default for StartScreenConfig {
    fn default() -> Self {
        Self {
            button_label: "Start".to_string(),
            caption: "Finde die richtige Weihnachtsbaumkugel".to_string(),
            colour: [255, 99, 71],
        }
    }
}

/// The full-screen picture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    /// The opacity of the black overlay behind the picture.
    pub overlay_alpha: f32,

    /// The maximum size of the picture as a percentage of the screen.
    pub max_image_percent: f32,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            overlay_alpha: 0.8,
            max_image_percent: 90.,
        }
    }
}

/// The config for the whole scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Where to load the assets from.
    pub assets: AssetPaths,

    /// The camera.
    pub camera: CameraConfig,

    /// The sky and lights.
    pub lighting: LightingConfig,

    /// The start screen.
    pub start_screen: StartScreenConfig,

    /// The picture modal.
    pub modal: ModalConfig,

    /// Where each day's decoration hangs.
    pub decorations: Vec<DecorationPlacement>,

    /// The radius of the sphere around each decoration that counts as clicking on it.
    pub pick_radius: f32,

    /// The asset path of the picture for each day.
    pub images: BTreeMap<u32, String>,

    /// Pretend that it's this day of the month instead of asking the clock.
    pub current_day: Option<u32>,

    /// The snowfall.
    pub snowfall: SnowfallConfig,
}

/// The positions of the 24 decorations, indexed by day - 1.
const DEFAULT_LAYOUT: [[f32; 3]; 24] = [
    [5., 20., 0.],
    [-5., 20., 0.],
    [5., 10., 0.],
    [-5., 10., 0.],
    [2., 25., 0.],
    [-2., 22., 0.],
    [5., 5., 0.],
    [-5., 5., 0.],
    [5., 20., 5.],
    [-5., 10., 5.],
    [3., 15., 8.],
    [5., 25., 2.],
    [-5., 15., -2.],
    [2., 12., 2.],
    [-2., 28., -2.],
    [-2., 12., -5.],
    [-2., 10., -7.],
    [5., 10., -7.],
    [8., 10., -2.],
    [-2., 19., -7.],
    [3., 15., -7.],
    [-2., 25., 3.],
    [0., 14., 8.],
    [-2., 25., -4.],
];

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            assets: AssetPaths::default(),
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            start_screen: StartScreenConfig::default(),
            modal: ModalConfig::default(),
            decorations: DEFAULT_LAYOUT
                .iter()
                .zip(1..)
                .map(|(&position, day)| DecorationPlacement {
                    day,
                    position: Vec3::from_array(position),
                })
                .collect(),
            pick_radius: 1.,
            images: (1..=24)
                .map(|day| (day, format!("images/image{day}.jpg")))
                .collect(),
            current_day: None,
            snowfall: SnowfallConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Return the filename to store the config in.
    pub const fn config_filename() -> &'static str {
        "config/scene.ron"
    }

    /// Load the config from [`Self::config_filename`], using the default if the file is
    /// unavailable.
    pub fn from_file() -> Self {
        Self::from_path(Self::config_filename())
    }

    /// Load the config from the given path. If the file is missing or can't be parsed, then write
    /// the default config there and return it. If only the snowfall config is unusable, then just
    /// that part is replaced with its default and written back.
    #[instrument]
    pub fn from_path(path: impl AsRef<Path> + std::fmt::Debug) -> Self {
        let path = path.as_ref();

        let write_and_return_default = || -> Self {
            let default = Self::default();
            default.save_to_path(path);
            default
        };

        let Ok(text) = fs::read_to_string(path) else {
            debug!("No config file, using the default");
            return write_and_return_default();
        };

        match ron::from_str::<Self>(&text) {
            Ok(mut config) => {
                if let Err(e) = config.snowfall.validate() {
                    warn!(%e, "Invalid snowfall config, replacing it with the default");
                    config.snowfall = SnowfallConfig::default();
                    config.save_to_path(path);
                }
                config
            }
            Err(e) => {
                warn!(?e, "Unable to parse config, replacing it with the default");
                write_and_return_default()
            }
        }
    }

    /// Save the config to the given path, creating its parent directory if needed.
    pub fn save_to_path(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            let _ = fs::DirBuilder::new().recursive(true).create(parent);
        }

        let text =
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default().struct_names(true))
                .expect_or_log("The scene config should be serializable");

        if let Err(e) = fs::write(path, text) {
            warn!(?e, ?path, "Unable to save config");
        }
    }

    /// The day of the month to open decorations for, either from the config or the clock.
    pub fn current_day(&self) -> u32 {
        self.current_day.unwrap_or_else(today)
    }

    /// Build the initial [`AdventState`] for this config.
    pub fn build_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<AdventState, AdventError> {
        let calendar = Calendar::new(
            &self.decorations,
            self.current_day(),
            self.images.clone(),
            rng,
        )?;

        Ok(AdventState::new(calendar))
    }
}
