//! Input model
//!
//! Keys routed to the widgets, and what a handler did with an input event.

/// Keys the widgets react to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Other(String),
}

impl Key {
    /// Parse a `KeyboardEvent.key` style name
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            " " | "Space" | "Spacebar" => Self::Space,
            "Tab" => Self::Tab,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Key press with modifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key, ctrl: false, alt: false, shift: false, meta: false }
    }
    pub fn ctrl(mut self) -> Self { self.ctrl = true; self }
    pub fn alt(mut self) -> Self { self.alt = true; self }
    pub fn shift(mut self) -> Self { self.shift = true; self }
    pub fn meta(mut self) -> Self { self.meta = true; self }

    /// Ctrl, Alt or Meta held (Shift alone does not count)
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// Result of routing an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// Some widget acted on the event
    pub handled: bool,
    /// The host must skip the default action
    pub default_prevented: bool,
    /// Later listeners must not see the event
    pub propagation_stopped: bool,
}

impl EventOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self { handled: true, ..Self::default() }
    }

    /// Handled with the default action suppressed
    pub fn prevented() -> Self {
        Self { handled: true, default_prevented: true, propagation_stopped: false }
    }

    /// Handled, default suppressed and propagation stopped
    pub fn intercepted() -> Self {
        Self { handled: true, default_prevented: true, propagation_stopped: true }
    }

    /// Fold a later handler's outcome into this one
    pub fn merge(&mut self, other: EventOutcome) {
        self.handled |= other.handled;
        self.default_prevented |= other.default_prevented;
        self.propagation_stopped |= other.propagation_stopped;
    }
}
