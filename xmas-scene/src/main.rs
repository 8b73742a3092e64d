//! This binary crate renders the Christmas advent scene with Bevy: a tree hung with one decoration
//! per day, snow falling around it, and a picture behind today's decoration.
//!
//! Everything that isn't rendering lives in `xmas-advent` and `xmas-snowfall`. The systems in
//! here just mirror that state into the Bevy world.

mod decorations;
mod modal;
mod setup;
mod snowfall;
mod start_screen;

use self::snowfall::Snowfall;
use bevy::{log::LogPlugin, prelude::*, window::close_on_esc, DefaultPlugins};
use color_eyre::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use smooth_bevy_cameras::{controllers::orbit::OrbitCameraPlugin, LookTransformPlugin};
use tracing::{info, instrument};
use tracing_subscriber::{filter::LevelFilter, fmt::Layer, prelude::*, EnvFilter};
use tracing_unwrap::ResultExt;
use xmas_advent::{AdventState, Phase, SceneConfig};

/// The Bevy state, which decides which systems run.
///
/// This always follows the [`Phase`] of the [`Advent`] resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum AppState {
    /// Only the start screen is shown.
    NotStarted,

    /// The tree and the snowfall are shown.
    Running,
}

impl From<Phase> for AppState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::NotStarted => Self::NotStarted,
            Phase::Running => Self::Running,
        }
    }
}

/// The state of the advent scene.
#[derive(Resource, Deref, DerefMut)]
pub(crate) struct Advent(pub(crate) AdventState);

/// The scene config, loaded once at startup.
#[derive(Resource, Deref)]
pub(crate) struct Config(pub(crate) SceneConfig);

/// Initialise a subscriber for tracing to log to `stdout`.
fn init_tracing() {
    let subscriber = tracing_subscriber::registry().with(
        Layer::new()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into())),
    );

    tracing::subscriber::set_global_default(subscriber)
        .expect_or_log("Setting the global default for tracing should be okay");
}

/// Load the config and run the scene.
fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let config = SceneConfig::from_file();
    let mut rng = StdRng::from_entropy();
    let state = config.build_state(&mut rng)?;
    info!(
        current_day = state.calendar().current_day(),
        decorations = state.calendar().decorations().len(),
        "Loaded scene config"
    );

    let snowfall = Snowfall::new(
        config.snowfall.clone(),
        StdRng::seed_from_u64(rng.gen()),
    );
    run_scene(config, state, snowfall);

    Ok(())
}

/// Build the Bevy app and run it until the window closes.
#[instrument(skip_all)]
fn run_scene(config: SceneConfig, state: AdventState, snowfall: Snowfall) {
    let [r, g, b] = config.lighting.sky_colour;
    let ambient_brightness = config.lighting.ambient_brightness;
    let initial_state = AppState::from(state.phase());

    // Logging is handled by tracing-subscriber in main, so Bevy's LogPlugin is disabled
    info!("Starting bevy app");
    App::new()
        .insert_resource(Msaa { samples: 4 })
        .insert_resource(ClearColor(Color::rgb_linear(r, g, b)))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: ambient_brightness,
        })
        .insert_resource(Config(config))
        .insert_resource(Advent(state))
        .insert_resource(snowfall)
        .add_plugins(
            DefaultPlugins
                .build()
                .disable::<LogPlugin>()
                .set(WindowPlugin {
                    window: WindowDescriptor {
                        title: "Christmas Advent Scene".to_string(),
                        ..default()
                    },
                    ..default()
                }),
        )
        .add_plugin(LookTransformPlugin)
        .add_plugin(OrbitCameraPlugin::default())
        .add_state(initial_state)
        .add_startup_system(setup::setup_camera)
        .add_startup_system(snowfall::load_snowflake_scene)
        .add_system(close_on_esc)
        .add_system_set(
            SystemSet::on_enter(AppState::NotStarted)
                .with_system(start_screen::spawn_start_screen),
        )
        .add_system_set(
            SystemSet::on_update(AppState::NotStarted).with_system(start_screen::press_start),
        )
        .add_system_set(
            SystemSet::on_exit(AppState::NotStarted)
                .with_system(start_screen::despawn_start_screen),
        )
        .add_system_set(
            SystemSet::on_enter(AppState::Running)
                .with_system(setup::setup_lights)
                .with_system(decorations::spawn_tree_and_decorations),
        )
        .add_system_set(
            SystemSet::on_update(AppState::Running)
                .with_system(decorations::report_tree_loaded)
                .with_system(decorations::tint_decorations)
                .with_system(modal::handle_clicks)
                .with_system(modal::show_modal)
                .with_system(snowfall::bind_snowflakes)
                .with_system(snowfall::animate_snowfall)
                .with_system(snowfall::reset_snowfall),
        )
        .run();
}
