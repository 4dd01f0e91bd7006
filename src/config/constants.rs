// ==================== Design Space ====================
// portrait 9:16, every coordinate in the crate lives in this space
pub const GAME_W: f32 = 540.0;
pub const GAME_H: f32 = 960.0;

pub const BG_COLOR: u32 = 0x0a0a2e;

// ==================== Transitions ====================
/// full opaque round trip, each half (cover in / cover out) is FADE_MS / 2
pub const FADE_MS: f32 = 1000.0;
/// delay between starting the next scene and uncovering it
pub const SWITCH_SETTLE_MS: f32 = 50.0;
/// cross-fade of scene roots over the backdrop (no cover)
pub const ELEMENT_FADE_MS: f32 = 400.0;

// ==================== Phone Screen Cutout ====================
// transparent window of the phone frame image
pub const SCREEN_X: f32 = 68.0;
pub const SCREEN_Y: f32 = 80.0;
pub const SCREEN_W: f32 = 400.0;
pub const SCREEN_H: f32 = 800.0;

// vanishing point, horizon sits a bit above the screen centre
pub const FOCAL_X: f32 = 268.0;
pub const FOCAL_Y: f32 = 385.0;

// ==================== Tunnel ====================
pub const TUNNEL_COLOR: u32 = 0x3ca2c8;
pub const TUNNEL_ACCENT: u32 = 0xdb4c77;
pub const TUNNEL_ACCENT_EVERY: usize = 4;
pub const RING_COUNT: usize = 18;
/// rings per second
pub const RING_SCROLL_SPEED: f32 = 0.35;
pub const DEPTH_EASE: f32 = 2.2;
pub const FAR_W: f32 = 32.0;
pub const FAR_H: f32 = 48.0;
pub const TUNNEL_RIBS_TOP_BOTTOM: usize = 5;
pub const TUNNEL_RIBS_LEFT_RIGHT: usize = 7;

// ==================== Particles ====================
pub const PARTICLE_COLORS: [u32; 4] = [0xf9c6d7, 0xdb4c77, 0x10559a, 0x3ca2c8];
/// share of the canvas the particle field tries to keep covered
pub const PARTICLE_COVERAGE: f32 = 0.14;
pub const PARTICLE_MIN_R: f32 = 3.0;
pub const PARTICLE_MAX_R: f32 = 12.0;
pub const PARTICLE_SPAWN_INTERVAL_MS: f32 = 80.0;
pub const PARTICLE_BATCH_CAP: usize = 10;
/// px/sec, radial component
pub const PARTICLE_DRIFT_SPEED: f32 = 50.0;
/// rad/sec, spiral component
pub const PARTICLE_ANGULAR_SPEED: f32 = 0.4;
pub const PARTICLE_GROW_MS_MIN: f32 = 1500.0;
pub const PARTICLE_GROW_MS_MAX: f32 = 2500.0;
/// particles die once they leave the canvas by more than this
pub const PARTICLE_EXIT_MARGIN: f32 = 20.0;

// ==================== Center Light Grid ====================
pub const CENTER_GRID_COLS: usize = 6;
pub const CENTER_GRID_ROWS: usize = 8;
pub const CENTER_GRID_COLOR_A: u32 = 0x3ca2c8;
pub const CENTER_GRID_COLOR_B: u32 = 0xdb4c77;
pub const CENTER_GRID_CYCLE_MS: f32 = 1200.0;
pub const CENTER_GRID_ALPHA: f32 = 0.85;

// ==================== Phone Zoom ====================
pub const PHONE_ZOOM_OUT_MS: f32 = 800.0;
pub const PHONE_ZOOM_IN_MS: f32 = 800.0;

// ==================== Cutscene ====================
pub const CUTSCENE_HOLD_MS: f32 = 8000.0;
pub const CUTSCENE_WIPE_MS: f32 = 1000.0;

// ==================== Widgets ====================
pub const TITLE_PULSE_MIN: f32 = 0.98;
pub const TITLE_PULSE_MAX: f32 = 1.03;
pub const TITLE_PULSE_MS: f32 = 2200.0;

pub const POP_SCALE: f32 = 1.08;
pub const POP_DURATION_MS: f32 = 80.0;

pub const BURST_DURATION_MS: f32 = 280.0;
pub const BURST_DISTANCE_PX: f32 = 14.0;
pub const BURST_SCALE_TO: f32 = 1.08;
pub const BURST_ALPHA_FROM: f32 = 0.85;

pub const CHARACTER_SLIDE_MS: f32 = 350.0;

pub const TOAST_MS: f32 = 1000.0;
pub const TOAST_RISE_PX: f32 = 30.0;

pub const PLAYER_NAME_MAX: usize = 12;

// ==================== Audio ====================
pub const BGM_TITLE: &str = "bgm_trapped";
pub const BGM_SHUFFLE: &str = "bgm_shuffle";
pub const SFX_BUTTON: &str = "sfx_button";
pub const BGM_SWITCH_FADE_MS: f32 = 500.0;
/// assumed clip length when the backend cannot report one
pub const SFX_FALLBACK_CLIP_MS: f32 = 500.0;
/// slack on top of the clip length before the sfx lock clears by itself
pub const SFX_UNLOCK_MARGIN_MS: f32 = 100.0;

// ==================== Text ====================
pub const NAME_INPUT_FONT_PX: f32 = 18.0;
pub const NAME_INPUT_PLACEHOLDER: &str = "Enter name...";
pub const TOAST_FONT_PX: f32 = 32.0;
pub const TOAST_TEXT: &str = "Coming Soon!";

// ==================== Shared Textures ====================
pub const PHONE_FRAME: &str = "start_bg";
pub const BTN_MAXIMIZE: &str = "btn_maximize";
pub const BTN_MINIMIZE: &str = "btn_minimize";
pub const SLIDER_BG: &str = "slider_bg";
pub const SLIDER_TRACK: &str = "slider_track";
pub const SLIDER_KNOB: &str = "slider_knob";
