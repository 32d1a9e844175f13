//! Pointer, keyboard and screen access

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use super::keys::Key;
use crate::error::ActionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn from_name(name: &str) -> Option<MouseButton> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Some(MouseButton::Left),
            "right" => Some(MouseButton::Right),
            "middle" => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Native input injection and screen capture.
///
/// Dry runs use [`RecordingInputDevice`]. Real runs use the `rdev`/`xcap`
/// backend when the `native-input` feature is enabled and
/// [`UnavailableInputDevice`] otherwise; see [`crate::agent::input_device`].
#[async_trait]
pub trait InputDevice: Send {
    async fn move_pointer(&mut self, x: i32, y: i32) -> Result<(), ActionError>;

    async fn click(&mut self, button: MouseButton) -> Result<(), ActionError>;

    async fn scroll(&mut self, direction: ScrollDirection, amount: u32) -> Result<(), ActionError>;

    async fn key_down(&mut self, key: Key) -> Result<(), ActionError>;

    async fn key_up(&mut self, key: Key) -> Result<(), ActionError>;

    async fn type_char(&mut self, c: char) -> Result<(), ActionError>;

    /// Capture the whole screen as PNG bytes.
    async fn capture_screen(&mut self) -> Result<Vec<u8>, ActionError>;
}

/// Input device shared between handlers; the lock serializes access.
pub type SharedInputDevice = Arc<Mutex<dyn InputDevice>>;

/// Event observed by [`RecordingInputDevice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    Move { x: i32, y: i32 },
    Click { button: MouseButton },
    Scroll { direction: ScrollDirection, amount: u32 },
    KeyDown { key: Key },
    KeyUp { key: Key },
    Type { c: char },
    Capture,
}

// 1x1 transparent PNG
const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// Dry-run device: records and logs every event instead of injecting it.
#[derive(Debug, Default)]
pub struct RecordingInputDevice {
    events: Vec<InputEvent>,
}

impl RecordingInputDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in the shared handle expected by the desktop actions.
    pub fn shared() -> (Arc<Mutex<RecordingInputDevice>>, SharedInputDevice) {
        let device = Arc::new(Mutex::new(Self::new()));
        let shared: SharedInputDevice = device.clone();
        (device, shared)
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Text produced by `Type` events and `Space` key presses.
    pub fn typed_text(&self) -> String {
        self.events
            .iter()
            .filter_map(|e| match e {
                InputEvent::Type { c } => Some(*c),
                InputEvent::KeyDown { key: Key::Space } => Some(' '),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, event: InputEvent) {
        debug!(?event, "Input event (dry run)");
        self.events.push(event);
    }
}

#[async_trait]
impl InputDevice for RecordingInputDevice {
    async fn move_pointer(&mut self, x: i32, y: i32) -> Result<(), ActionError> {
        self.record(InputEvent::Move { x, y });
        Ok(())
    }

    async fn click(&mut self, button: MouseButton) -> Result<(), ActionError> {
        self.record(InputEvent::Click { button });
        Ok(())
    }

    async fn scroll(&mut self, direction: ScrollDirection, amount: u32) -> Result<(), ActionError> {
        self.record(InputEvent::Scroll { direction, amount });
        Ok(())
    }

    async fn key_down(&mut self, key: Key) -> Result<(), ActionError> {
        self.record(InputEvent::KeyDown { key });
        Ok(())
    }

    async fn key_up(&mut self, key: Key) -> Result<(), ActionError> {
        self.record(InputEvent::KeyUp { key });
        Ok(())
    }

    async fn type_char(&mut self, c: char) -> Result<(), ActionError> {
        self.record(InputEvent::Type { c });
        Ok(())
    }

    async fn capture_screen(&mut self) -> Result<Vec<u8>, ActionError> {
        self.record(InputEvent::Capture);
        Ok(PLACEHOLDER_PNG.to_vec())
    }
}

/// Device for builds without a native backend.
///
/// Every operation fails with [`ActionError::Unsupported`], so input and
/// screenshot commands are logged as failed instead of silently skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableInputDevice;

impl UnavailableInputDevice {
    pub fn shared() -> SharedInputDevice {
        Arc::new(Mutex::new(UnavailableInputDevice))
    }

    fn unsupported<T>(operation: &str) -> Result<T, ActionError> {
        Err(ActionError::Unsupported(format!(
            "{operation} requires native input support (build with the `native-input` feature)"
        )))
    }
}

#[async_trait]
impl InputDevice for UnavailableInputDevice {
    async fn move_pointer(&mut self, _x: i32, _y: i32) -> Result<(), ActionError> {
        Self::unsupported("pointer movement")
    }

    async fn click(&mut self, _button: MouseButton) -> Result<(), ActionError> {
        Self::unsupported("mouse clicks")
    }

    async fn scroll(&mut self, _direction: ScrollDirection, _amount: u32) -> Result<(), ActionError> {
        Self::unsupported("scrolling")
    }

    async fn key_down(&mut self, _key: Key) -> Result<(), ActionError> {
        Self::unsupported("key presses")
    }

    async fn key_up(&mut self, _key: Key) -> Result<(), ActionError> {
        Self::unsupported("key presses")
    }

    async fn type_char(&mut self, _c: char) -> Result<(), ActionError> {
        Self::unsupported("typing")
    }

    async fn capture_screen(&mut self) -> Result<Vec<u8>, ActionError> {
        Self::unsupported("screen capture")
    }
}
