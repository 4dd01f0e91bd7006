use crate::assets::{self, AssetStore};
use crate::audio::{AudioCoordinator, HtmlAudioBackend};
use crate::background::BackgroundAnimator;
use crate::browser;
use crate::config::constants::{BG_COLOR, GAME_H, GAME_W, PHONE_FRAME};
use crate::config::manifest::{CharacterData, Manifest, MANIFEST_PATH};
use crate::dom::{BrowserSurface, DomSurface};
use crate::engine::input::PointerEvent;
use crate::engine::{Game, Point, Rect, Renderer, Size, FRAME_SIZE};
use crate::scenes::{self, Launch, Scene, SceneContext, Screen};
use crate::session::Session;
use crate::settings::{self, Settings};
use crate::transition::TransitionCoordinator;
use crate::widgets::MaximizeControl;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// ┌─────────────────────────── Frame Overview ───────────────────────────┐
/// │                                                                      │
/// │   GameLoop ──► TrappedInThePhone::update ──► Stage::update           │
/// │                                                                      │
/// │   1. pointer events   client px ──► design space (viewport)          │
/// │   2. session          BGM fades, click sound lock                    │
/// │   3. transitions      may hand back a switch ──► scenes::enter       │
/// │   4. fade overlay     cover opacity ──► DOM                          │
/// │   5. backdrop         tunnel, particles, phone zoom                  │
/// │   6. maximise control first dibs on taps                             │
/// │   7. active scene     widgets, requests transitions                  │
/// │                                                                      │
/// ├─────────────────────────── Draw Order ───────────────────────────────┤
/// │   clear ──► backdrop ──► scene (scene alpha) ──► maximise control    │
/// │   the opaque cover lives in the DOM above the canvas                 │
/// └──────────────────────────────────────────────────────────────────────┘
pub enum TrappedInThePhone {
    /// Manifest, images and settings are being fetched
    Loading,
    Loaded(Stage),
}

impl Default for TrappedInThePhone {
    fn default() -> Self {
        TrappedInThePhone::new()
    }
}

impl TrappedInThePhone {
    pub fn new() -> Self {
        TrappedInThePhone::Loading
    }

    async fn load_manifest() -> Result<Manifest> {
        browser::fetch_json::<Manifest>(MANIFEST_PATH)
            .await
            .with_context(|| format!("Failed to load asset manifest from : {}", MANIFEST_PATH))
    }
}

#[async_trait(?Send)]
impl Game for TrappedInThePhone {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            TrappedInThePhone::Loading => {
                let manifest = Self::load_manifest().await?;
                let mut audio = HtmlAudioBackend::new();
                let assets = assets::preload(&manifest, &mut audio).await;
                log::info!(
                    "Preloaded {} images, {} characters",
                    manifest.images().count(),
                    manifest.characters.len()
                );

                let settings = Settings::load(settings::default_store());
                let surface = BrowserSurface::new()?;
                let stage = Stage::new(
                    Session::new(settings, AudioCoordinator::new(Box::new(audio))),
                    Box::new(surface),
                    assets,
                    manifest.characters,
                    StdRng::from_entropy(),
                );
                Ok(Box::new(TrappedInThePhone::Loaded(stage)))
            }
            TrappedInThePhone::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, pointer: &[PointerEvent]) {
        if let TrappedInThePhone::Loaded(stage) = self {
            stage.update(FRAME_SIZE, pointer);
        }
    }

    fn draw(&mut self, renderer: &Renderer) {
        if let TrappedInThePhone::Loaded(stage) = self {
            stage.draw(renderer);
        }
    }
}

/// Everything alive after preload : the shared session, the backdrop, the
/// transition coordinator and the one active scene.
pub struct Stage {
    session: Session,
    transitions: TransitionCoordinator,
    background: BackgroundAnimator,
    maximize: MaximizeControl,
    surface: Box<dyn DomSurface>,
    assets: AssetStore,
    characters: Vec<CharacterData>,
    scene: Box<dyn Scene>,
    rng: StdRng,
}

impl Stage {
    /// Opens on the launch screen, fading in from black.
    pub fn new(
        mut session: Session,
        mut surface: Box<dyn DomSurface>,
        assets: AssetStore,
        characters: Vec<CharacterData>,
        rng: StdRng,
    ) -> Self {
        let mut transitions = TransitionCoordinator::starting_at(Screen::Launch);
        let mut background = BackgroundAnimator::new();
        let mut maximize = MaximizeControl::new();
        surface.set_maximized(session.settings.is_maximized());

        let scene: Box<dyn Scene> = Box::new(Launch::new(&mut SceneContext {
            session: &mut session,
            transitions: &mut transitions,
            background: &mut background,
            maximize: &mut maximize,
            surface: surface.as_mut(),
            assets: &assets,
            characters: &characters,
        }));
        transitions.fade_from_black(&mut session.input_lock);
        surface.set_fade_opacity(transitions.cover_opacity());

        Stage {
            session,
            transitions,
            background,
            maximize,
            surface,
            assets,
            characters,
            scene,
            rng,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transitions(&self) -> &TransitionCoordinator {
        &self.transitions
    }

    pub fn background(&self) -> &BackgroundAnimator {
        &self.background
    }

    pub fn maximize(&self) -> &MaximizeControl {
        &self.maximize
    }

    /// Screen of the scene currently built, lags the coordinator by one
    /// tick around a switch.
    pub fn active_screen(&self) -> Screen {
        self.scene.screen()
    }

    /// `pointer` in client pixels.
    pub fn update(&mut self, dt_ms: f32, pointer: &[PointerEvent]) {
        let viewport = self.surface.viewport();
        let pointer: Vec<PointerEvent> = pointer
            .iter()
            .map(|event| PointerEvent {
                position: viewport.to_design(event.position),
                ..*event
            })
            .collect();

        self.session.update(dt_ms);
        let switch = self
            .transitions
            .update(dt_ms, &mut self.session.input_lock);

        let Stage {
            session,
            transitions,
            background,
            maximize,
            surface,
            assets,
            characters,
            scene,
            rng,
        } = self;
        let mut ctx = SceneContext {
            session,
            transitions,
            background,
            maximize,
            surface: surface.as_mut(),
            assets: &*assets,
            characters: characters.as_slice(),
        };
        if let Some(request) = switch {
            *scene = scenes::enter(request, &mut ctx);
        }
        ctx.surface.set_fade_opacity(ctx.transitions.cover_opacity());
        ctx.background.update(dt_ms, rng);

        let taken =
            ctx.maximize
                .update(&pointer, ctx.assets, &mut ctx.session.settings, ctx.surface);
        let pointer: &[PointerEvent] = if taken { &[] } else { &pointer };
        scene.update(&mut ctx, dt_ms, pointer);
    }

    pub fn draw(&self, renderer: &Renderer) {
        let canvas = Rect::new(Point::new(0.0, 0.0), Size::new(GAME_W, GAME_H));
        renderer.clear(&canvas);
        renderer.fill_rect(&canvas, BG_COLOR, 1.0);
        self.background
            .draw(renderer, self.assets.get(PHONE_FRAME));
        self.scene
            .draw(renderer, &self.assets, self.transitions.scene_alpha());
        self.maximize
            .draw(renderer, &self.assets, &self.session.settings);
    }
}
