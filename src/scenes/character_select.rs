use super::{Scene, SceneContext, Screen};
use crate::assets::AssetStore;
use crate::config::constants::{
    BGM_SHUFFLE, CHARACTER_SLIDE_MS, NAME_INPUT_FONT_PX, NAME_INPUT_PLACEHOLDER, PLAYER_NAME_MAX,
};
use crate::config::layout::character_select as layout;
use crate::config::manifest::CharacterData;
use crate::dom::TextInputConfig;
use crate::engine::input::PointerEvent;
use crate::engine::{Point, Rect, Renderer, Size};
use crate::tween::{lerp, Ease, Progress, Tween};
use crate::widgets::{ImageButton, TextInput};

const TITLE_CARD: &str = "cs_title";
const FRAME: &str = "cs_frame";
const NAME_PLATE: &str = "cs_text_entry";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Index of the neighbour of `index` among `len` characters, wrapping.
    fn neighbour(self, index: usize, len: usize) -> usize {
        match self {
            Direction::Left => (index + len - 1) % len,
            Direction::Right => (index + 1) % len,
        }
    }

    /// (incoming start x, outgoing end x). The right arrow brings the next
    /// character in from the right.
    fn slide_ends(self) -> (f32, f32) {
        let travel = layout::INNER_W / 2.0 + layout::SLIDE_BUFFER;
        let hidden_left = layout::FRAME.x - travel;
        let hidden_right = layout::FRAME.x + travel;
        match self {
            Direction::Left => (hidden_left, hidden_right),
            Direction::Right => (hidden_right, hidden_left),
        }
    }
}

/// ┌──────────────── Carousel ────────────────┐
/// │  Still ── arrow ──► Sliding (input lock) │
/// │  Sliding ── 350 ms ──► Still (unlock)    │
/// │           index = incoming               │
/// └──────────────────────────────────────────┘
#[derive(Debug, Copy, Clone, PartialEq)]
enum Carousel {
    Still,
    Sliding {
        incoming: usize,
        direction: Direction,
        tween: Tween,
    },
}

pub struct CharacterSelect {
    characters: Vec<CharacterData>,
    index: usize,
    carousel: Carousel,
    name: TextInput,
    left: ImageButton,
    right: ImageButton,
    select: ImageButton,
    /// frame and name plate, when the pack ships them
    decorations: Vec<(&'static str, Point)>,
}

impl CharacterSelect {
    pub fn new(ctx: &mut SceneContext) -> Self {
        ctx.background.set_visible(true);
        ctx.background.set_phone_frame_visible(false);
        ctx.maximize.set_visible(true);
        ctx.session.ensure_bgm(BGM_SHUFFLE);

        let selected = ctx.session.settings.selected_character_id();
        let index = ctx
            .characters
            .iter()
            .position(|character| character.id == selected)
            .unwrap_or(0);

        let name = TextInput::new(
            ctx.surface,
            Rect::from_center(
                layout::NAME_INPUT,
                Size::new(layout::NAME_INPUT_W, layout::NAME_INPUT_H),
            ),
            NAME_INPUT_FONT_PX,
            &TextInputConfig {
                placeholder: NAME_INPUT_PLACEHOLDER.to_string(),
                max_length: PLAYER_NAME_MAX,
                initial_value: ctx.session.settings.player_name().to_string(),
            },
        );

        let decorations = [(FRAME, layout::FRAME), (NAME_PLATE, layout::NAME_INPUT)]
            .into_iter()
            .filter(|(key, _)| ctx.assets.exists(key))
            .collect();

        CharacterSelect {
            characters: ctx.characters.to_vec(),
            index,
            carousel: Carousel::Still,
            name,
            left: ImageButton::new("cs_left", layout::LEFT_ARROW),
            right: ImageButton::new("cs_right", layout::RIGHT_ARROW),
            select: ImageButton::new("cs_select", layout::SELECT_BUTTON),
            decorations,
        }
    }

    pub fn current(&self) -> Option<&CharacterData> {
        self.characters.get(self.index)
    }

    pub fn is_sliding(&self) -> bool {
        self.carousel != Carousel::Still
    }

    fn start_slide(&mut self, ctx: &mut SceneContext, direction: Direction) {
        if self.is_sliding() || self.characters.is_empty() {
            return;
        }
        let arrow = match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        };
        arrow.spawn_burst();
        ctx.session.input_lock.lock();
        self.carousel = Carousel::Sliding {
            incoming: direction.neighbour(self.index, self.characters.len()),
            direction,
            tween: Tween::new(0.0, 1.0, CHARACTER_SLIDE_MS, Ease::QuadInOut),
        };
    }

    fn advance_slide(&mut self, ctx: &mut SceneContext, dt_ms: f32) {
        if let Carousel::Sliding {
            incoming, tween, ..
        } = &mut self.carousel
        {
            if let Progress::Done(_) = tween.update(dt_ms) {
                self.index = *incoming;
                self.carousel = Carousel::Still;
                ctx.session.input_lock.unlock();
                log::debug!("Character {:?} in view", self.current().map(|c| &c.id));
            }
        }
    }

    fn on_select(&mut self, ctx: &mut SceneContext) {
        if let Some(character) = self.characters.get(self.index) {
            log::info!("Character selected : {}", character.id);
            ctx.session.settings.set_selected_character_id(&character.id);
        }
        ctx.transparent_transition_to(Screen::LevelSelect);
    }

    /// Portraits in view with their x, outgoing first.
    fn portraits(&self) -> Vec<(&str, f32)> {
        let key = |index: usize| {
            self.characters
                .get(index)
                .map(|character| character.select_key.as_str())
        };
        let center_x = layout::PORTRAIT.x;
        match self.carousel {
            Carousel::Still => key(self.index).map(|k| (k, center_x)).into_iter().collect(),
            Carousel::Sliding {
                incoming,
                direction,
                tween,
            } => {
                let (start_x, exit_x) = direction.slide_ends();
                let t = tween.value();
                [
                    key(self.index).map(|k| (k, lerp(center_x, exit_x, t))),
                    key(incoming).map(|k| (k, lerp(start_x, center_x, t))),
                ]
                .into_iter()
                .flatten()
                .collect()
            }
        }
    }
}

impl Scene for CharacterSelect {
    fn screen(&self) -> Screen {
        Screen::CharacterSelect
    }

    fn update(&mut self, ctx: &mut SceneContext, dt_ms: f32, pointer: &[PointerEvent]) {
        self.advance_slide(ctx, dt_ms);

        if let Some(name) = self.name.update(&*ctx.surface, pointer) {
            ctx.session.settings.set_player_name(&name);
        }

        if self.left.update(dt_ms, pointer, ctx.assets, ctx.session) {
            self.start_slide(ctx, Direction::Left);
        }
        if self.right.update(dt_ms, pointer, ctx.assets, ctx.session) {
            self.start_slide(ctx, Direction::Right);
        }
        if self.select.update(dt_ms, pointer, ctx.assets, ctx.session) {
            self.on_select(ctx);
        }
    }

    fn draw(&self, renderer: &Renderer, assets: &AssetStore, alpha: f32) {
        if let Some(image) = assets.get(TITLE_CARD) {
            renderer.draw_image(image, layout::TITLE, 1.0, alpha);
        }

        let cutout = Rect::from_center(layout::FRAME, Size::new(layout::INNER_W, layout::INNER_H));
        renderer.clipped(&cutout, |renderer| {
            for (key, x) in self.portraits() {
                if let Some(image) = assets.get(key) {
                    renderer.draw_image(image, Point::new(x, layout::PORTRAIT.y), 1.0, alpha);
                }
            }
        });

        for (key, center) in &self.decorations {
            if let Some(image) = assets.get(key) {
                renderer.draw_image(image, *center, 1.0, alpha);
            }
        }
        self.left.draw(renderer, assets, alpha);
        self.right.draw(renderer, assets, alpha);
        self.select.draw(renderer, assets, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;
    use crate::settings::{keys, MemoryStore};
    use approx::assert_relative_eq;

    const STEP: f32 = 10.0;

    fn setup(store: MemoryStore) -> Harness {
        Harness::at(
            Screen::CharacterSelect,
            store,
            &[
                ("cs_left", Size::new(60.0, 90.0)),
                ("cs_right", Size::new(60.0, 90.0)),
                ("cs_select", Size::new(240.0, 80.0)),
            ],
        )
    }

    fn run(harness: &mut Harness, scene: &mut CharacterSelect, ticks: usize) {
        for _ in 0..ticks {
            harness.run(scene, STEP, &[]);
        }
    }

    fn tap(harness: &mut Harness, scene: &mut CharacterSelect, at: Point) {
        harness.run(scene, STEP, &[PointerEvent::down(at.x, at.y)]);
    }

    #[test]
    fn opens_on_the_stored_character() {
        let mut harness = setup(MemoryStore::new().with(keys::SELECTED_CHARACTER, "Char_2"));
        let scene = CharacterSelect::new(&mut harness.ctx());
        assert_eq!(scene.current().unwrap().id, "Char_2");
        assert!(!harness.background.is_phone_frame_visible());
        assert_eq!(harness.session.audio.current_bgm_key(), Some(BGM_SHUFFLE));

        let mut fallback = setup(MemoryStore::new().with(keys::SELECTED_CHARACTER, "Nobody"));
        let scene = CharacterSelect::new(&mut fallback.ctx());
        assert_eq!(scene.current().unwrap().id, "Char_1");
    }

    #[test]
    fn only_shipped_decorations_are_kept() {
        let mut harness = setup(MemoryStore::new());
        let scene = CharacterSelect::new(&mut harness.ctx());
        assert!(scene.decorations.is_empty());

        let mut framed = Harness::at(
            Screen::CharacterSelect,
            MemoryStore::new(),
            &[(FRAME, Size::new(540.0, 960.0))],
        );
        let scene = CharacterSelect::new(&mut framed.ctx());
        assert_eq!(scene.decorations, vec![(FRAME, layout::FRAME)]);
    }

    #[test]
    fn right_arrow_slides_in_the_next_character_and_wraps() {
        let mut harness = setup(MemoryStore::new().with(keys::SELECTED_CHARACTER, "Char_3"));
        let mut scene = CharacterSelect::new(&mut harness.ctx());

        tap(&mut harness, &mut scene, layout::RIGHT_ARROW);
        run(&mut harness, &mut scene, 20);
        assert!(scene.is_sliding());
        assert!(harness.session.input_lock.is_locked());
        assert_eq!(scene.right.burst_count(), 1);
        assert_eq!(scene.portraits().len(), 2);

        // a second tap mid-slide is swallowed
        tap(&mut harness, &mut scene, layout::RIGHT_ARROW);
        run(&mut harness, &mut scene, 50);
        assert!(!scene.is_sliding());
        assert!(!harness.session.input_lock.is_locked());
        assert_eq!(scene.current().unwrap().id, "Char_1");
        assert_eq!(scene.portraits(), vec![("char1_select", layout::PORTRAIT.x)]);
    }

    #[test]
    fn left_arrow_wraps_to_the_last_character() {
        let mut harness = setup(MemoryStore::new());
        let mut scene = CharacterSelect::new(&mut harness.ctx());
        tap(&mut harness, &mut scene, layout::LEFT_ARROW);
        run(&mut harness, &mut scene, 70);
        assert_eq!(scene.current().unwrap().id, "Char_3");
    }

    #[test]
    fn sliding_portraits_start_and_end_outside_the_cutout() {
        let half_portrait = layout::INNER_W / 2.0;
        for direction in [Direction::Left, Direction::Right] {
            let (start_x, exit_x) = direction.slide_ends();
            for x in [start_x, exit_x] {
                assert!(
                    x + half_portrait <= layout::FRAME.x - layout::INNER_W / 2.0
                        || x - half_portrait >= layout::FRAME.x + layout::INNER_W / 2.0
                );
            }
        }
        let (start_x, _) = Direction::Right.slide_ends();
        assert_relative_eq!(start_x, 270.0 + 159.0 + 200.0);
    }

    #[test]
    fn typed_name_is_saved_and_the_field_leaves_with_the_scene() {
        let store = MemoryStore::new().with(keys::PLAYER_NAME, "Kim");
        let mut harness = setup(store);
        let mut scene = CharacterSelect::new(&mut harness.ctx());
        {
            let state = harness.surface.state.borrow();
            let config = state.inputs[0].config.as_ref().unwrap();
            assert_eq!(config.initial_value, "Kim");
            assert_eq!(config.max_length, PLAYER_NAME_MAX);
        }

        harness.surface.state.borrow_mut().type_text("Robin");
        run(&mut harness, &mut scene, 1);
        assert_eq!(harness.session.settings.player_name(), "Robin");

        drop(scene);
        assert_eq!(harness.surface.state.borrow().open_inputs(), 0);
    }

    #[test]
    fn select_saves_the_character_and_cross_fades_to_level_select() {
        let mut harness = setup(MemoryStore::new());
        let mut scene = CharacterSelect::new(&mut harness.ctx());
        tap(&mut harness, &mut scene, layout::RIGHT_ARROW);
        run(&mut harness, &mut scene, 70);

        tap(&mut harness, &mut scene, layout::SELECT_BUTTON);
        let mut switched = None;
        for _ in 0..150 {
            switched = switched.or(harness.run(&mut scene, STEP, &[]));
        }
        assert_eq!(harness.session.settings.selected_character_id(), "Char_2");
        assert_eq!(switched.map(|request| request.target), Some(Screen::LevelSelect));
    }
}
