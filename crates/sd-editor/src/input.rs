//! Input abstraction layer.
//!
//! Normalizes host pointer, wheel and keyboard events into a single
//! `InputEvent` enum. Pointer positions are in screen space relative to
//! the drawing surface (the host subtracts the surface's own offset).

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
    Other(i16),
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        button: PointerButton,
        modifiers: Modifiers,
    },

    PointerMove { x: f64, y: f64, modifiers: Modifiers },

    PointerUp { x: f64, y: f64 },

    /// Mouse wheel; positive `delta_y` scrolls down (zooms out).
    Wheel { delta_y: f64 },

    /// `key` is the DOM `KeyboardEvent.key` value (e.g. `"Delete"`, `"z"`).
    KeyDown {
        key: String,
        modifiers: Modifiers,
        /// A text field has keyboard focus; editing shortcuts must not fire.
        text_input_focused: bool,
    },

    KeyUp { key: String },
}

impl InputEvent {
    /// Primary-button pointer down without modifiers.
    pub fn down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn key(key: &str) -> Self {
        Self::KeyDown {
            key: key.to_string(),
            modifiers: Modifiers::default(),
            text_input_focused: false,
        }
    }
}
