//! Content screens. Exactly one is active; the transition coordinator decides
//! when it is replaced and the stage builds the next one through `enter`.
//!
//! ┌──────────────────── Screen Table ─────────────────────┐
//! │  From            →  Allowed targets                   │
//! ├───────────────────────────────────────────────────────┤
//! │  Launch          →  IntroCutscene                     │
//! │  IntroCutscene   →  StartMenu                         │
//! │  StartMenu       →  CharacterSelect, Settings         │
//! │  Settings        →  StartMenu, LevelSelect            │
//! │  CharacterSelect →  LevelSelect                       │
//! │  LevelSelect     →  CharacterSelect, Settings         │
//! └───────────────────────────────────────────────────────┘
mod character_select;
mod cutscene;
mod launch;
mod level_select;
mod settings_menu;
mod start_menu;

pub use self::character_select::CharacterSelect;
pub use self::cutscene::IntroCutscene;
pub use self::launch::Launch;
pub use self::level_select::LevelSelect;
pub use self::settings_menu::SettingsMenu;
pub use self::start_menu::StartMenu;

use crate::assets::AssetStore;
use crate::background::BackgroundAnimator;
use crate::config::manifest::CharacterData;
use crate::dom::DomSurface;
use crate::engine::input::PointerEvent;
use crate::engine::Renderer;
use crate::session::Session;
use crate::transition::{Admission, TransitionCoordinator, TransitionRequest};
use crate::widgets::MaximizeControl;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Screen {
    Launch,
    IntroCutscene,
    StartMenu,
    Settings,
    CharacterSelect,
    LevelSelect,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Launch,
        Screen::IntroCutscene,
        Screen::StartMenu,
        Screen::Settings,
        Screen::CharacterSelect,
        Screen::LevelSelect,
    ];

    pub fn allowed_targets(self) -> &'static [Screen] {
        match self {
            Screen::Launch => &[Screen::IntroCutscene],
            Screen::IntroCutscene => &[Screen::StartMenu],
            Screen::StartMenu => &[Screen::CharacterSelect, Screen::Settings],
            Screen::Settings => &[Screen::StartMenu, Screen::LevelSelect],
            Screen::CharacterSelect => &[Screen::LevelSelect],
            Screen::LevelSelect => &[Screen::CharacterSelect, Screen::Settings],
        }
    }

    pub fn can_transition_to(self, target: Screen) -> bool {
        self.allowed_targets().contains(&target)
    }
}

/// Extra word passed along with a transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScenePayload {
    /// start menu reached from inside the phone, zoom the frame back in
    FromInside,
}

/// Everything a scene may touch besides itself.
pub struct SceneContext<'a> {
    pub session: &'a mut Session,
    pub transitions: &'a mut TransitionCoordinator,
    pub background: &'a mut BackgroundAnimator,
    pub maximize: &'a mut MaximizeControl,
    pub surface: &'a mut dyn DomSurface,
    pub assets: &'a AssetStore,
    pub characters: &'a [CharacterData],
}

impl SceneContext<'_> {
    pub fn transition_to(&mut self, target: Screen, payload: Option<ScenePayload>) -> Admission {
        self.transitions
            .transition_to(target, payload, &mut self.session.input_lock)
    }

    pub fn transparent_transition_to(&mut self, target: Screen) -> Admission {
        self.transitions
            .transparent_transition_to(target, None, &mut self.session.input_lock)
    }
}

pub trait Scene {
    fn screen(&self) -> Screen;
    /// `pointer` is already in design space.
    fn update(&mut self, ctx: &mut SceneContext, dt_ms: f32, pointer: &[PointerEvent]);
    /// `alpha` is the scene root's opacity.
    fn draw(&self, renderer: &Renderer, assets: &AssetStore, alpha: f32);
}

/// Build the scene a switch asks for. Scenes configure the shared backdrop,
/// the maximise control and the music on entry.
pub fn enter(request: TransitionRequest, ctx: &mut SceneContext) -> Box<dyn Scene> {
    log::info!("Entering {:?}", request.target);
    match request.target {
        Screen::Launch => Box::new(Launch::new(ctx)),
        Screen::IntroCutscene => Box::new(IntroCutscene::new(ctx)),
        Screen::StartMenu => Box::new(StartMenu::new(ctx, request.payload)),
        Screen::Settings => Box::new(SettingsMenu::new(ctx)),
        Screen::CharacterSelect => Box::new(CharacterSelect::new(ctx)),
        Screen::LevelSelect => Box::new(LevelSelect::new(ctx)),
    }
}
