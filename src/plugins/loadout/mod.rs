//! Loadout screen: character and theme selection before a run.
//!
//! ```text
//!   OnEnter(Loadout)  reset LoadoutUi, request character + theme
//!   Update            apply_loadout_commands -> drive_character_load -> poll_theme
//!                     -> refresh_loadout_ui -> rotate_preview
//!   OnExit(Loadout)   release preview entities
//! ```
//!
//! Character loading is a small polled state machine with at most one load in flight:
//!
//! ```text
//!   Idle ──request──> Resolving ──entry missing──> Retry(timer) ──elapsed──> Resolving
//!                        │  └──no prefab: warn──> Idle
//!                        v
//!                     Settling(one frame off-screen) ──> Idle (or Resolving if re-requested)
//! ```

use bevy::prelude::*;

use crate::common::error::RunError;
use crate::common::state::{AppState, StateRequest};
use crate::common::tunables::Tunables;
use crate::plugins::profile::{PlayerProfile, ProfileStore};
use crate::plugins::run::modifier;

pub mod catalog;

pub use catalog::{Catalog, CharacterEntry, ThemeEntry};

/// Where the preview sits while its first frame settles.
pub const PREVIEW_OFFSCREEN: Vec3 = Vec3::new(-10_000.0, 0.0, 0.0);
/// Where the preview is shown.
pub const PREVIEW_POSITION: Vec3 = Vec3::new(0.0, -40.0, 5.0);

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadoutCommand {
    /// Step the selected character, wrapping around the owned list.
    ChangeCharacter(i32),
    ChangeTheme(i32),
    StartRun,
}

/// Loadout overlay surface, mirrored to UI text in the full app.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LoadoutUi {
    pub tutorial_blocker_visible: bool,
    pub tutorial_prompt_visible: bool,
    pub run_button_enabled: bool,
    pub run_button_label: String,
    pub character_selector_visible: bool,
    pub theme_selector_visible: bool,
    pub character_name: Option<String>,
    pub theme_name: Option<String>,
    pub theme_icon: Option<String>,
}

impl Default for LoadoutUi {
    fn default() -> Self {
        Self {
            tutorial_blocker_visible: false,
            tutorial_prompt_visible: false,
            run_button_enabled: false,
            run_button_label: "Loading...".into(),
            character_selector_visible: false,
            theme_selector_visible: false,
            character_name: None,
            theme_name: None,
            theme_icon: None,
        }
    }
}

impl LoadoutUi {
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        let arrows = |visible: bool| if visible { ("< ", " >") } else { ("", "") };

        let (l, r) = arrows(self.character_selector_visible);
        out.push(format!(
            "character {l}{}{r}",
            self.character_name.as_deref().unwrap_or("...")
        ));
        let (l, r) = arrows(self.theme_selector_visible);
        out.push(format!(
            "theme {l}{}{r}",
            self.theme_name.as_deref().unwrap_or("...")
        ));

        if self.run_button_enabled {
            out.push(format!("[Enter] {}", self.run_button_label));
        } else {
            out.push(self.run_button_label.clone());
        }
        if self.tutorial_prompt_visible {
            out.push("First run plays the tutorial".into());
        }
        out
    }
}

/// Marker for spawned character previews.
#[derive(Component, Debug, Clone)]
pub struct CharacterPreview {
    pub name: String,
}

#[derive(Debug, Default)]
pub enum CharacterLoad {
    #[default]
    Idle,
    Resolving,
    Retry(Timer),
    Settling { entity: Entity, name: String },
}

#[derive(Resource, Debug, Default)]
pub struct LoadoutState {
    pub character: CharacterLoad,
    /// Another character was requested while one was in flight.
    reload_character: bool,
    /// Preview currently shown.
    preview: Option<Entity>,
    theme_pending: bool,
}

impl LoadoutState {
    /// Ask for the selected character to be (re)loaded. Never starts a second load.
    pub fn request_character(&mut self) {
        match self.character {
            CharacterLoad::Idle => self.character = CharacterLoad::Resolving,
            _ => self.reload_character = true,
        }
    }

    pub fn request_theme(&mut self) {
        self.theme_pending = true;
    }

    pub fn theme_pending(&self) -> bool {
        self.theme_pending
    }

    pub fn preview(&self) -> Option<Entity> {
        self.preview
    }
}

pub fn plugin(app: &mut App) {
    if !app.world().contains_resource::<Catalog>() {
        let path = app.world().resource::<Tunables>().loadout.catalog_path.clone();
        app.insert_resource(Catalog::load_or_unloaded(path));
    }

    app.init_resource::<LoadoutUi>()
        .init_resource::<LoadoutState>()
        .add_message::<LoadoutCommand>()
        .add_systems(OnEnter(AppState::Loadout), enter_loadout)
        .add_systems(OnExit(AppState::Loadout), exit_loadout)
        .add_systems(
            OnTransition {
                exited: AppState::Loadout,
                entered: AppState::Game,
            },
            modifier::hand_over_modifier,
        )
        .add_systems(
            Update,
            (
                apply_loadout_commands,
                drive_character_load,
                poll_theme,
                refresh_loadout_ui,
                rotate_preview,
            )
                .chain()
                .run_if(in_state(AppState::Loadout)),
        );
}

pub fn register_input(app: &mut App) {
    app.add_systems(
        Update,
        gather_loadout_input
            .before(apply_loadout_commands)
            .run_if(in_state(AppState::Loadout)),
    );
}

pub fn enter_loadout(
    mut ui: ResMut<LoadoutUi>,
    mut state: ResMut<LoadoutState>,
    profile: Res<PlayerProfile>,
    catalog: Res<Catalog>,
) {
    *ui = LoadoutUi {
        tutorial_blocker_visible: !profile.tutorial_done,
        ..default()
    };
    if let Err(e) = catalog.check_configured() {
        warn!("{e}");
    }
    state.request_character();
    state.request_theme();
}

/// Release every preview, including one still settling.
pub fn exit_loadout(mut commands: Commands, mut state: ResMut<LoadoutState>) {
    if let Some(e) = state.preview.take() {
        commands.entity(e).despawn();
    }
    if let CharacterLoad::Settling { entity, .. } = state.character {
        commands.entity(entity).despawn();
    }
    *state = LoadoutState::default();
}

pub fn apply_loadout_commands(
    mut commands: MessageReader<LoadoutCommand>,
    mut state: ResMut<LoadoutState>,
    mut profile: ResMut<PlayerProfile>,
    store: Res<ProfileStore>,
    ui: Res<LoadoutUi>,
    mut requests: MessageWriter<StateRequest>,
) {
    for cmd in commands.read().copied() {
        match cmd {
            LoadoutCommand::ChangeCharacter(dir) => {
                profile.cycle_character(dir);
                state.request_character();
            }
            LoadoutCommand::ChangeTheme(dir) => {
                profile.cycle_theme(dir);
                state.request_theme();
            }
            LoadoutCommand::StartRun => {
                if !ui.run_button_enabled {
                    debug!("run requested before the catalog loaded");
                    continue;
                }
                start_game(&mut profile, &store);
                requests.write(StateRequest(AppState::Game));
            }
        }
    }
}

/// A finished tutorial plus one press of start means the first real run is starting.
pub fn start_game(profile: &mut PlayerProfile, store: &ProfileStore) {
    if profile.tutorial_done && profile.ftue_level == 1 {
        profile.ftue_level = 2;
        store.save_or_warn(profile);
    }
}

/// Look up the selected character in the catalog.
pub fn resolve_character<'a>(
    profile: &PlayerProfile,
    catalog: &'a Catalog,
) -> Result<&'a CharacterEntry, RunError> {
    let name = profile
        .used_character_name()
        .ok_or_else(|| RunError::ConfigurationMissing("profile owns no character".into()))?;
    catalog
        .character(name)
        .ok_or_else(|| RunError::ResourceUnavailable(format!("character {name:?} not in catalog")))
}

pub fn drive_character_load(
    mut commands: Commands,
    time: Res<Time>,
    mut state: ResMut<LoadoutState>,
    mut ui: ResMut<LoadoutUi>,
    profile: Res<PlayerProfile>,
    catalog: Res<Catalog>,
    tunables: Res<Tunables>,
) {
    let state = &mut *state;
    match &mut state.character {
        CharacterLoad::Idle => {}
        CharacterLoad::Retry(timer) => {
            timer.tick(time.delta());
            if timer.is_finished() {
                state.character = CharacterLoad::Resolving;
            }
        }
        CharacterLoad::Resolving => {
            // Any pending re-request is satisfied by this resolution.
            state.reload_character = false;
            state.character = match resolve_character(&profile, &catalog) {
                Ok(CharacterEntry {
                    name,
                    prefab: Some(prefab),
                }) => {
                    debug!("loading preview {prefab} for {name}");
                    let entity = commands
                        .spawn((
                            Name::new(format!("Preview {name}")),
                            CharacterPreview { name: name.clone() },
                            Sprite {
                                color: preview_color(name),
                                custom_size: Some(Vec2::new(32.0, 48.0)),
                                ..default()
                            },
                            Transform::from_translation(PREVIEW_OFFSCREEN),
                        ))
                        .id();
                    CharacterLoad::Settling {
                        entity,
                        name: name.clone(),
                    }
                }
                Ok(CharacterEntry { name, prefab: None }) => {
                    warn!("character {name:?} has no preview asset, giving up");
                    CharacterLoad::Idle
                }
                Err(RunError::ResourceUnavailable(e)) => {
                    debug!("{e}, retrying");
                    CharacterLoad::Retry(Timer::from_seconds(
                        tunables.loadout.character_retry_delay,
                        TimerMode::Once,
                    ))
                }
                Err(e) => {
                    warn!("{e}");
                    CharacterLoad::Idle
                }
            };
        }
        CharacterLoad::Settling { entity, name } => {
            commands
                .entity(*entity)
                .insert(Transform::from_translation(PREVIEW_POSITION));
            if let Some(previous) = state.preview.replace(*entity) {
                commands.entity(previous).despawn();
            }
            ui.character_name = Some(name.clone());
            state.character = if std::mem::take(&mut state.reload_character) {
                CharacterLoad::Resolving
            } else {
                CharacterLoad::Idle
            };
        }
    }
}

/// Show the selected theme once the catalog has it.
pub fn populate_theme(
    profile: &PlayerProfile,
    catalog: &Catalog,
    ui: &mut LoadoutUi,
) -> Result<(), RunError> {
    let name = profile
        .used_theme_name()
        .ok_or_else(|| RunError::ConfigurationMissing("profile owns no theme".into()))?;
    let theme = catalog
        .theme(name)
        .ok_or_else(|| RunError::ResourceUnavailable(format!("theme {name:?} not in catalog")))?;
    ui.theme_name = Some(theme.name.clone());
    ui.theme_icon = theme.icon.clone();
    Ok(())
}

pub fn poll_theme(
    mut state: ResMut<LoadoutState>,
    mut ui: ResMut<LoadoutUi>,
    profile: Res<PlayerProfile>,
    catalog: Res<Catalog>,
) {
    if !state.theme_pending {
        return;
    }
    match populate_theme(&profile, &catalog, &mut ui) {
        Ok(()) => state.theme_pending = false,
        Err(RunError::ResourceUnavailable(_)) => {}
        Err(e) => {
            warn!("{e}");
            state.theme_pending = false;
        }
    }
}

pub fn refresh_loadout_ui(
    mut ui: ResMut<LoadoutUi>,
    profile: Res<PlayerProfile>,
    catalog: Res<Catalog>,
) {
    if catalog.is_loaded() && !ui.run_button_enabled {
        ui.run_button_enabled = true;
        ui.run_button_label = "Run!".into();
        ui.tutorial_prompt_visible = !profile.tutorial_done;
    }
    ui.character_selector_visible = profile.characters.len() > 1;
    ui.theme_selector_visible = profile.themes.len() > 1;
}

fn rotate_preview(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut q: Query<&mut Transform, With<CharacterPreview>>,
) {
    let step = tunables.loadout.preview_rotation_speed.to_radians() * time.delta_secs();
    for mut t in &mut q {
        t.rotate_z(step);
    }
}

fn preview_color(name: &str) -> Color {
    let hue = name.bytes().fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32)) % 360;
    Color::hsl(hue as f32, 0.6, 0.55)
}

fn gather_loadout_input(keys: Res<ButtonInput<KeyCode>>, mut out: MessageWriter<LoadoutCommand>) {
    if keys.just_pressed(KeyCode::ArrowLeft) {
        out.write(LoadoutCommand::ChangeCharacter(-1));
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        out.write(LoadoutCommand::ChangeCharacter(1));
    }
    if keys.just_pressed(KeyCode::ArrowUp) {
        out.write(LoadoutCommand::ChangeTheme(-1));
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        out.write(LoadoutCommand::ChangeTheme(1));
    }
    if keys.just_pressed(KeyCode::Enter) || keys.just_pressed(KeyCode::Space) {
        out.write(LoadoutCommand::StartRun);
    }
}
