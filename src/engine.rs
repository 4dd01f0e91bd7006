use crate::browser;
use anyhow::{anyhow, Error, Result};
// ELI5: web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use self::input::PointerEvent;

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    /// One fixed step. Pointer events of the frame arrive with its first step.
    fn update(&mut self, pointer: &[PointerEvent]);
    fn draw(&mut self, renderer: &Renderer);
}

// length of a frame in milliseconds
pub const FRAME_SIZE: f32 = 1.0 / 60.0 * 1000.0;
// a backgrounded tab resumes with a huge delta, don't replay all of it
const MAX_CATCH_UP_FRAMES: f32 = 10.0;

pub struct GameLoop {
    last_frame: f64,
    accumulated_delta: f32,
    /// events waiting for the next fixed step
    pending: Vec<PointerEvent>,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut pointer_receiver = input::prepare_input()?;
        let mut game = game.initialize().await?;
        let mut game_loop = GameLoop::new(browser::now()?);
        let renderer = Renderer::new(browser::context()?)?;
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            let events = input::drain(&mut pointer_receiver);
            game_loop.advance(perf, events, |pointer| game.update(pointer));
            game.draw(&renderer);
            if let Some(closure) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(closure) {
                    log::error!("GameLoop: could not schedule next frame : {:#?}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }

    fn new(now: f64) -> Self {
        GameLoop {
            last_frame: now,
            accumulated_delta: 0.0,
            pending: Vec::new(),
        }
    }

    /// Run as many fixed steps as the time since the last frame allows.
    /// Events ride along with the first step; a frame too short for any step
    /// keeps them for the next one. Returns the number of steps taken.
    fn advance(
        &mut self,
        now: f64,
        events: Vec<PointerEvent>,
        mut step: impl FnMut(&[PointerEvent]),
    ) -> usize {
        self.pending.extend(events);
        self.accumulated_delta = (self.accumulated_delta + (now - self.last_frame) as f32)
            .min(FRAME_SIZE * MAX_CATCH_UP_FRAMES);
        self.last_frame = now;

        let mut steps = 0;
        while self.accumulated_delta >= FRAME_SIZE {
            step(&self.pending);
            self.pending.clear();
            self.accumulated_delta -= FRAME_SIZE;
            steps += 1;
        }
        steps
    }
}

// ==================== Geometry ====================
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }

    pub fn scaled(self, scale: f32) -> Self {
        Size {
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}

/// Axis aligned box, `position` is the top left corner
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub fn from_center(center: Point, size: Size) -> Self {
        Rect {
            position: Point {
                x: center.x - size.width / 2.0,
                y: center.y - size.height / 2.0,
            },
            size,
        }
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.position.x + self.size.width / 2.0,
            y: self.position.y + self.size.height / 2.0,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

/// 0xRRGGBB -> "#rrggbb"
pub fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0xff_ffff)
}

// ==================== Rendering ====================
pub struct Image {
    element: HtmlImageElement,
    size: Size,
}

impl Image {
    pub fn new(element: HtmlImageElement) -> Self {
        let size = Size {
            width: element.natural_width() as f32,
            height: element.natural_height() as f32,
        };
        Image { element, size }
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
    // offscreen target for tinting, resized per draw
    scratch: HtmlCanvasElement,
    scratch_context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(context: CanvasRenderingContext2d) -> Result<Self> {
        let scratch = browser::create_canvas()?;
        let scratch_context = browser::context_of(&scratch)?;
        Ok(Renderer {
            context,
            scratch,
            scratch_context,
        })
    }

    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.left().into(),
            rect.top().into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    pub fn fill_rect(&self, rect: &Rect, color: u32, alpha: f32) {
        self.context.set_global_alpha(alpha.clamp(0.0, 1.0).into());
        self.context.set_fill_style_str(&css_color(color));
        self.context.fill_rect(
            rect.left().into(),
            rect.top().into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
        self.context.set_global_alpha(1.0);
    }

    pub fn stroke_path(&self, points: &[Point], closed: bool, width: f32, color: u32, alpha: f32) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.context.set_global_alpha(alpha.clamp(0.0, 1.0).into());
        self.context.set_stroke_style_str(&css_color(color));
        self.context.set_line_width(width.into());
        self.context.begin_path();
        self.context.move_to(first.x.into(), first.y.into());
        for point in rest {
            self.context.line_to(point.x.into(), point.y.into());
        }
        if closed {
            self.context.close_path();
        }
        self.context.stroke();
        self.context.set_global_alpha(1.0);
    }

    /// Draw `image` centred on `center`, uniformly scaled.
    pub fn draw_image(&self, image: &Image, center: Point, scale: f32, alpha: f32) {
        let destination = Rect::from_center(center, image.size.scaled(scale));
        self.draw_image_in(image, &destination, alpha);
    }

    pub fn draw_image_in(&self, image: &Image, destination: &Rect, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        self.context.set_global_alpha(alpha.min(1.0).into());
        if let Err(err) = self
            .context
            .draw_image_with_html_image_element_and_dw_and_dh(
                &image.element,
                destination.left().into(),
                destination.top().into(),
                destination.size.width.into(),
                destination.size.height.into(),
            )
        {
            log::error!("Renderer: draw_image failed : {:#?}", err);
        }
        self.context.set_global_alpha(1.0);
    }

    /// Draw `image` as a flat silhouette of `tint`, centred on `center`.
    pub fn draw_image_tinted(&self, image: &Image, center: Point, scale: f32, tint: u32, alpha: f32) {
        let destination = Rect::from_center(center, image.size.scaled(scale));
        let width = destination.size.width.ceil().max(1.0);
        let height = destination.size.height.ceil().max(1.0);
        if alpha <= 0.0 {
            return;
        }

        // resizing also clears the scratch canvas
        self.scratch.set_width(width as u32);
        self.scratch.set_height(height as u32);
        let scratch = &self.scratch_context;
        let silhouette = scratch
            .draw_image_with_html_image_element_and_dw_and_dh(
                &image.element,
                0.0,
                0.0,
                width.into(),
                height.into(),
            )
            .and_then(|_| scratch.set_global_composite_operation("source-in"));
        if let Err(err) = silhouette {
            log::error!("Renderer: tint failed : {:#?}", err);
            return;
        }
        scratch.set_fill_style_str(&css_color(tint));
        scratch.fill_rect(0.0, 0.0, width.into(), height.into());

        self.context.set_global_alpha(alpha.min(1.0).into());
        if let Err(err) = self
            .context
            .draw_image_with_html_canvas_element_and_dw_and_dh(
                &self.scratch,
                destination.left().into(),
                destination.top().into(),
                width.into(),
                height.into(),
            )
        {
            log::error!("Renderer: draw tinted image failed : {:#?}", err);
        }
        self.context.set_global_alpha(1.0);
    }

    /// Draw only the left `visible_width` pixels of an image centred on `center`.
    pub fn draw_image_cropped(&self, image: &Image, center: Point, visible_width: f32, alpha: f32) {
        let width = visible_width.clamp(0.0, image.size.width);
        if width <= 0.0 || alpha <= 0.0 {
            return;
        }
        let full = Rect::from_center(center, image.size);
        self.context.set_global_alpha(alpha.min(1.0).into());
        if let Err(err) = self
            .context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &image.element,
                0.0,
                0.0,
                width.into(),
                image.size.height.into(),
                full.left().into(),
                full.top().into(),
                width.into(),
                image.size.height.into(),
            )
        {
            log::error!("Renderer: draw_image_cropped failed : {:#?}", err);
        }
        self.context.set_global_alpha(1.0);
    }

    pub fn draw_text(&self, text: &str, center: Point, font_px: f32, fill: u32, stroke: u32, alpha: f32) {
        self.context.set_global_alpha(alpha.clamp(0.0, 1.0).into());
        self.context.set_font(&format!("{}px Arial, sans-serif", font_px));
        self.context.set_text_align("center");
        self.context.set_text_baseline("middle");
        self.context.set_line_width(4.0);
        self.context.set_stroke_style_str(&css_color(stroke));
        self.context.set_fill_style_str(&css_color(fill));
        let stroked = self
            .context
            .stroke_text(text, center.x.into(), center.y.into());
        let filled = self.context.fill_text(text, center.x.into(), center.y.into());
        if let Err(err) = stroked.and(filled) {
            log::error!("Renderer: draw_text failed : {:#?}", err);
        }
        self.context.set_global_alpha(1.0);
    }

    /// Run `draw` with everything outside `rect` masked away.
    pub fn clipped(&self, rect: &Rect, draw: impl FnOnce(&Renderer)) {
        self.context.save();
        self.context.begin_path();
        self.context.rect(
            rect.left().into(),
            rect.top().into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
        self.context.clip();
        draw(self);
        self.context.restore();
    }

    /// Run `draw` with additive blending.
    pub fn additive(&self, draw: impl FnOnce(&Renderer)) {
        self.context.save();
        if let Err(err) = self.context.set_global_composite_operation("lighter") {
            log::warn!("Renderer: additive blending unavailable : {:#?}", err);
        }
        draw(self);
        self.context.restore();
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(Image)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<Image> {
    let image = browser::new_image()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let source_name = source.to_string();
    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine.rs::load_image] Error loading image {}: {:#?}",
                source_name,
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // ?? - double unwrap because Result<Result<(), Error>, oneshot::Canceled>
    rx.await??;

    Ok(Image::new(image))
}

/// Pointer plumbing : DOM listeners push into a channel, the loop drains it
/// once per animation frame.
pub mod input {
    use super::Point;
    use crate::browser;
    use anyhow::Result;
    use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
    use wasm_bindgen::JsCast;
    use web_sys::PointerEvent as DomPointerEvent;

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub enum PointerKind {
        Down,
        Move,
        Up,
    }

    /// `position` is in client (CSS pixel) space until the stage maps it into
    /// design space.
    #[derive(Debug, Copy, Clone, PartialEq)]
    pub struct PointerEvent {
        pub kind: PointerKind,
        pub position: Point,
    }

    impl PointerEvent {
        pub fn down(x: f32, y: f32) -> Self {
            PointerEvent {
                kind: PointerKind::Down,
                position: Point { x, y },
            }
        }

        pub fn moved(x: f32, y: f32) -> Self {
            PointerEvent {
                kind: PointerKind::Move,
                position: Point { x, y },
            }
        }

        pub fn up(x: f32, y: f32) -> Self {
            PointerEvent {
                kind: PointerKind::Up,
                position: Point { x, y },
            }
        }
    }

    pub fn prepare_input() -> Result<UnboundedReceiver<PointerEvent>> {
        let (sender, receiver) = unbounded();
        let canvas = browser::canvas()?;
        let document = browser::document()?;
        // down only counts on the canvas, move/up follow drags off of it
        listen(&canvas, "pointerdown", PointerKind::Down, sender.clone())?;
        listen(&document, "pointermove", PointerKind::Move, sender.clone())?;
        listen(&document, "pointerup", PointerKind::Up, sender)?;
        Ok(receiver)
    }

    fn listen(
        target: &web_sys::EventTarget,
        event_name: &str,
        kind: PointerKind,
        sender: UnboundedSender<PointerEvent>,
    ) -> Result<()> {
        let callback = browser::closure_wrap(Box::new(move |event: web_sys::Event| {
            if let Some(event) = event.dyn_ref::<DomPointerEvent>() {
                let _ = sender.unbounded_send(PointerEvent {
                    kind,
                    position: Point {
                        x: event.client_x() as f32,
                        y: event.client_y() as f32,
                    },
                });
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        browser::add_listener(target, event_name, &callback)?;
        callback.forget();
        Ok(())
    }

    pub fn drain(receiver: &mut UnboundedReceiver<PointerEvent>) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = receiver.try_next() {
            events.push(event);
        }
        events
    }
}
