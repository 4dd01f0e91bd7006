//! Pointer-driven building blocks of the menu scenes. None of them owns a
//! callback : `update` reports what happened and the scene acts on it.
mod burst;
mod button;
mod maximize;
mod slider;
mod text_input;

pub use self::burst::{Burst, BurstClone};
pub use self::button::{ImageButton, LockPolicy};
pub use self::maximize::MaximizeControl;
pub use self::slider::Slider;
pub use self::text_input::TextInput;

use crate::engine::input::{PointerEvent, PointerKind};
use crate::engine::Rect;

/// Any press inside `rect` this tick.
pub fn tapped(pointer: &[PointerEvent], rect: &Rect) -> bool {
    pointer
        .iter()
        .any(|event| event.kind == PointerKind::Down && rect.contains(event.position))
}

/// True when the tick carries any press at all.
pub fn any_press(pointer: &[PointerEvent]) -> bool {
    pointer.iter().any(|event| event.kind == PointerKind::Down)
}
