//! Widget placement in the 540x960 design space.
//! Every image is drawn around its centre (origin 0.5, 0.5).
use crate::engine::Point;

const fn at(x: f32, y: f32) -> Point {
    Point { x, y }
}

pub const MAXIMIZE: Point = at(505.0, 925.0);
pub const LAUNCH: Point = at(270.0, 480.0);
pub const CUTSCENE: Point = at(270.0, 480.0);

pub mod start_menu {
    use super::*;
    pub const TITLE: Point = at(270.0, 200.0);
    pub const START_BUTTON: Point = at(270.0, 537.0);
    pub const SETTINGS_BUTTON: Point = at(270.0, 662.0);
}

pub mod settings {
    use super::*;
    pub const HEADER: Point = at(270.0, 200.0);
    pub const MUSIC_LABEL: Point = at(270.0, 400.0);
    pub const MUSIC_SLIDER: Point = at(270.0, 475.0);
    pub const SFX_LABEL: Point = at(270.0, 600.0);
    pub const SFX_SLIDER: Point = at(270.0, 675.0);
    pub const BACK_BUTTON: Point = at(60.0, 925.0);
}

pub mod character_select {
    use super::*;
    pub const TITLE: Point = at(270.0, 96.0);
    pub const NAME_INPUT: Point = at(270.0, 185.0);
    pub const NAME_INPUT_W: f32 = 280.0;
    pub const NAME_INPUT_H: f32 = 50.0;
    pub const FRAME: Point = at(270.0, 479.0);
    pub const PORTRAIT: Point = at(270.0, 479.0);
    pub const LEFT_ARROW: Point = at(44.0, 479.0);
    pub const RIGHT_ARROW: Point = at(496.0, 479.0);
    pub const SELECT_BUTTON: Point = at(270.0, 854.0);

    // frame image is 350x576, opaque border ends 16px in
    pub const FRAME_W: f32 = 350.0;
    pub const FRAME_H: f32 = 576.0;
    pub const CUTOUT_OFFSET: f32 = 16.0;
    pub const INNER_W: f32 = FRAME_W - CUTOUT_OFFSET * 2.0;
    pub const INNER_H: f32 = FRAME_H - CUTOUT_OFFSET * 2.0;
    /// extra travel so a sliding portrait starts and ends fully hidden
    pub const SLIDE_BUFFER: f32 = 200.0;
}

pub mod level_select {
    use super::*;
    pub const TITLE: Point = at(182.5, 125.0);
    pub const PORTRAIT: Point = at(440.0, 125.0);
    pub const LEVELS: [Point; 4] = [
        at(150.0, 350.0),
        at(390.0, 350.0),
        at(150.0, 590.0),
        at(390.0, 590.0),
    ];
    pub const SETTINGS_BUTTON: Point = at(147.0, 897.0);
    pub const ACHIEVEMENTS_BUTTON: Point = at(357.0, 897.0);
    pub const TOAST: Point = at(270.0, 480.0);
}
