//! Everything the game does to the page besides drawing on the canvas:
//! the fade overlay, the container's `maximized` class, the canvas placement
//! and native `<input>` fields.
use crate::browser::{self, html};
use crate::engine::{Point, Rect};
use crate::viewport::ViewportTransform;
use anyhow::{anyhow, Result};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement, HtmlInputElement, KeyboardEvent};

pub const MAXIMIZED_CLASS: &str = "maximized";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInputConfig {
    pub placeholder: String,
    pub max_length: usize,
    pub initial_value: String,
}

/// A native text field living on top of the canvas.
pub trait TextInputHost {
    /// `rect` and `font_px` are in CSS pixels.
    fn place(&mut self, rect: &Rect, font_px: f32);
    /// Latest value typed since the previous call.
    fn take_value(&mut self) -> Option<String>;
    fn blur(&mut self);
}

pub trait DomSurface {
    fn set_fade_opacity(&mut self, opacity: f32);
    fn set_maximized(&mut self, maximized: bool);
    /// Canvas placement in client pixels, for pointer mapping.
    fn viewport(&self) -> ViewportTransform;
    /// Canvas placement inside the container, for absolutely positioned
    /// overlays.
    fn overlay_viewport(&self) -> ViewportTransform;
    /// `None` when the page cannot host a field, the scene then goes without.
    fn create_text_input(&mut self, config: &TextInputConfig) -> Option<Box<dyn TextInputHost>>;
}

// ==================== Browser ====================
const FADE_OVERLAY_CSS: &str = "position: absolute; top: 0; left: 0; width: 100%; height: 100%; \
     background-color: black; opacity: 0; pointer-events: none; z-index: 9998;";

const TEXT_INPUT_CSS: &str = "position: absolute; font-family: Arial, sans-serif; \
     text-align: center; border: 3px solid #ffffff; border-radius: 8px; \
     background-color: rgba(0, 0, 0, 0.7); color: #ffffff; padding: 8px; outline: none; \
     box-sizing: border-box; -webkit-appearance: none; appearance: none; z-index: 9997;";

pub struct BrowserSurface {
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    fade_overlay: HtmlElement,
    fade_opacity: Option<f32>,
}

impl BrowserSurface {
    pub fn new() -> Result<Self> {
        let container = browser::container()?;
        let canvas = browser::canvas()?;

        // a stale overlay survives hot reloads
        if let Some(stale) = browser::document()?.get_element_by_id(html::FADE_OVERLAY_ID) {
            stale.remove();
        }
        let fade_overlay = browser::create_html_element("div")?;
        fade_overlay.set_id(html::FADE_OVERLAY_ID);
        fade_overlay.style().set_css_text(FADE_OVERLAY_CSS);
        container
            .append_child(&fade_overlay)
            .map_err(|err| anyhow!("Could not attach the fade overlay : {:#?}", err))?;

        Ok(BrowserSurface {
            container,
            canvas,
            fade_overlay,
            fade_opacity: None,
        })
    }
}

impl DomSurface for BrowserSurface {
    fn set_fade_opacity(&mut self, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if self.fade_opacity == Some(opacity) {
            return;
        }
        self.fade_opacity = Some(opacity);
        if let Err(err) = self
            .fade_overlay
            .style()
            .set_property("opacity", &opacity.to_string())
        {
            log::warn!("Fade overlay opacity : {:#?}", err);
        }
    }

    fn set_maximized(&mut self, maximized: bool) {
        let classes = self.container.class_list();
        let result = if maximized {
            classes.add_1(MAXIMIZED_CLASS)
        } else {
            classes.remove_1(MAXIMIZED_CLASS)
        };
        if let Err(err) = result {
            log::warn!("Could not toggle '{}' : {:#?}", MAXIMIZED_CLASS, err);
        }
    }

    fn viewport(&self) -> ViewportTransform {
        let rect = self.canvas.get_bounding_client_rect();
        ViewportTransform::from_canvas_rect(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }

    fn overlay_viewport(&self) -> ViewportTransform {
        // absolute children are placed from the padding box
        let rect = self.container.get_bounding_client_rect();
        self.viewport().relative_to(Point::new(
            rect.left() as f32 + self.container.client_left() as f32,
            rect.top() as f32 + self.container.client_top() as f32,
        ))
    }

    fn create_text_input(&mut self, config: &TextInputConfig) -> Option<Box<dyn TextInputHost>> {
        match NativeTextInput::new(&self.container, config) {
            Ok(input) => Some(Box::new(input)),
            Err(err) => {
                log::error!("Text input unavailable : {:#}", err);
                None
            }
        }
    }
}

/// `<input type="text">` forwarding its value on `input` and `blur`.
/// Enter blurs. The element and its listeners go away on drop.
pub struct NativeTextInput {
    element: HtmlInputElement,
    values: UnboundedReceiver<String>,
    listeners: Vec<(&'static str, Closure<dyn FnMut(web_sys::Event)>)>,
    placement: Option<(Rect, f32)>,
}

impl NativeTextInput {
    pub fn new(container: &HtmlElement, config: &TextInputConfig) -> Result<Self> {
        let element = browser::create_input_element()?;
        element.set_type("text");
        element.set_placeholder(&config.placeholder);
        element.set_max_length(config.max_length as i32);
        element.set_value(&config.initial_value);
        element.style().set_css_text(TEXT_INPUT_CSS);

        let (sender, values) = unbounded();
        let listeners = vec![
            ("input", forward_value(&element, "input", sender.clone())?),
            ("blur", forward_value(&element, "blur", sender)?),
            ("keydown", blur_on_enter(&element)?),
        ];

        container
            .append_child(&element)
            .map_err(|err| anyhow!("Could not attach text input : {:#?}", err))?;

        Ok(NativeTextInput {
            element,
            values,
            listeners,
            placement: None,
        })
    }
}

fn forward_value(
    element: &HtmlInputElement,
    event_name: &str,
    sender: UnboundedSender<String>,
) -> Result<Closure<dyn FnMut(web_sys::Event)>> {
    let source = element.clone();
    let callback = browser::closure_wrap(Box::new(move |_event: web_sys::Event| {
        let _ = sender.unbounded_send(source.value());
    }) as Box<dyn FnMut(web_sys::Event)>);
    browser::add_listener(element, event_name, &callback)?;
    Ok(callback)
}

fn blur_on_enter(element: &HtmlInputElement) -> Result<Closure<dyn FnMut(web_sys::Event)>> {
    let source = element.clone();
    let callback = browser::closure_wrap(Box::new(move |event: web_sys::Event| {
        if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
            if event.key() == "Enter" {
                if let Err(err) = source.blur() {
                    log::warn!("Could not blur text input : {:#?}", err);
                }
            }
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    browser::add_listener(element, "keydown", &callback)?;
    Ok(callback)
}

impl TextInputHost for NativeTextInput {
    fn place(&mut self, rect: &Rect, font_px: f32) {
        if self.placement == Some((*rect, font_px)) {
            return;
        }
        self.placement = Some((*rect, font_px));
        let style = self.element.style();
        let properties = [
            ("left", format!("{}px", rect.left())),
            ("top", format!("{}px", rect.top())),
            ("width", format!("{}px", rect.size.width)),
            ("height", format!("{}px", rect.size.height)),
            ("font-size", format!("{}px", font_px)),
        ];
        for (name, value) in properties {
            if let Err(err) = style.set_property(name, &value) {
                log::warn!("Text input {} : {:#?}", name, err);
            }
        }
    }

    fn take_value(&mut self) -> Option<String> {
        let mut latest = None;
        while let Ok(Some(value)) = self.values.try_next() {
            latest = Some(value);
        }
        latest
    }

    fn blur(&mut self) {
        if let Err(err) = self.element.blur() {
            log::warn!("Could not blur text input : {:#?}", err);
        }
    }
}

impl Drop for NativeTextInput {
    fn drop(&mut self) {
        for (event_name, callback) in &self.listeners {
            if let Err(err) = browser::remove_listener(&self.element, event_name, callback) {
                log::warn!("{:#}", err);
            }
        }
        self.element.remove();
    }
}

// ==================== Headless ====================
/// What a headless surface has been told, shared with whoever built it.
#[derive(Debug, Default)]
pub struct HeadlessState {
    pub fade_opacity: f32,
    pub maximized: bool,
    pub viewport: ViewportTransform,
    /// client position of the container's padding box
    pub container_origin: Point,
    pub inputs: Vec<HeadlessInputState>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct HeadlessInputState {
    pub config: Option<TextInputConfig>,
    pub placement: Option<(Rect, f32)>,
    pub typed: Vec<String>,
    pub blurred: usize,
    pub removed: bool,
}

impl HeadlessState {
    /// Simulate typing into the most recent field that is still on the page.
    pub fn type_text(&mut self, value: &str) -> bool {
        match self.inputs.iter_mut().rev().find(|input| !input.removed) {
            Some(input) => {
                input.typed.push(value.to_string());
                true
            }
            None => false,
        }
    }

    pub fn open_inputs(&self) -> usize {
        self.inputs.iter().filter(|input| !input.removed).count()
    }
}

/// Surface for native tests and for pages without a DOM.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    pub state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomSurface for HeadlessSurface {
    fn set_fade_opacity(&mut self, opacity: f32) {
        self.state.borrow_mut().fade_opacity = opacity.clamp(0.0, 1.0);
    }

    fn set_maximized(&mut self, maximized: bool) {
        self.state.borrow_mut().maximized = maximized;
    }

    fn viewport(&self) -> ViewportTransform {
        self.state.borrow().viewport
    }

    fn overlay_viewport(&self) -> ViewportTransform {
        let state = self.state.borrow();
        state.viewport.relative_to(state.container_origin)
    }

    fn create_text_input(&mut self, config: &TextInputConfig) -> Option<Box<dyn TextInputHost>> {
        let mut state = self.state.borrow_mut();
        state.inputs.push(HeadlessInputState {
            config: Some(config.clone()),
            ..HeadlessInputState::default()
        });
        Some(Box::new(HeadlessTextInput {
            index: state.inputs.len() - 1,
            state: self.state.clone(),
        }))
    }
}

struct HeadlessTextInput {
    index: usize,
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessTextInput {
    fn with<R>(&self, f: impl FnOnce(&mut HeadlessInputState) -> R) -> Option<R> {
        self.state.borrow_mut().inputs.get_mut(self.index).map(f)
    }
}

impl TextInputHost for HeadlessTextInput {
    fn place(&mut self, rect: &Rect, font_px: f32) {
        self.with(|input| input.placement = Some((*rect, font_px)));
    }

    fn take_value(&mut self) -> Option<String> {
        self.with(|input| input.typed.drain(..).last()).flatten()
    }

    fn blur(&mut self) {
        self.with(|input| input.blurred += 1);
    }
}

impl Drop for HeadlessTextInput {
    fn drop(&mut self) {
        self.with(|input| input.removed = true);
    }
}
