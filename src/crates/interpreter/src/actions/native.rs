//! Native input backend: `rdev` event simulation and `xcap` screen capture

use std::io::Cursor;

use async_trait::async_trait;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use rdev::{Button, EventType};
use tracing::debug;

use super::input::{InputDevice, MouseButton, ScrollDirection};
use super::keys::Key;
use crate::error::ActionError;

/// Injects events into the running desktop session.
#[derive(Debug, Default)]
pub struct NativeInputDevice;

impl NativeInputDevice {
    pub fn new() -> Self {
        Self
    }

    fn send(event: EventType) -> Result<(), ActionError> {
        debug!(?event, "Simulating input event");
        rdev::simulate(&event)
            .map_err(|e| ActionError::device(format!("failed to simulate {event:?}: {e:?}")))
    }

    fn tap(key: rdev::Key) -> Result<(), ActionError> {
        Self::send(EventType::KeyPress(key))?;
        Self::send(EventType::KeyRelease(key))
    }
}

fn native_key(key: Key) -> Result<rdev::Key, ActionError> {
    use rdev::Key as K;

    let mapped = match key {
        Key::ControlLeft => K::ControlLeft,
        Key::ControlRight => K::ControlRight,
        Key::ShiftLeft => K::ShiftLeft,
        Key::ShiftRight => K::ShiftRight,
        Key::AltLeft => K::Alt,
        Key::AltRight => K::AltGr,
        Key::MetaLeft | Key::LeftSuper => K::MetaLeft,
        Key::MetaRight | Key::RightSuper => K::MetaRight,
        Key::Enter => K::Return,
        Key::Escape => K::Escape,
        Key::Tab => K::Tab,
        Key::Space => K::Space,
        Key::Backspace => K::Backspace,
        Key::Delete => K::Delete,
        Key::Insert => K::Insert,
        Key::Home => K::Home,
        Key::End => K::End,
        Key::PageUp => K::PageUp,
        Key::PageDown => K::PageDown,
        Key::ArrowUp => K::UpArrow,
        Key::ArrowDown => K::DownArrow,
        Key::ArrowLeft => K::LeftArrow,
        Key::ArrowRight => K::RightArrow,
        Key::F1 => K::F1,
        Key::F2 => K::F2,
        Key::F3 => K::F3,
        Key::F4 => K::F4,
        Key::F5 => K::F5,
        Key::F6 => K::F6,
        Key::F7 => K::F7,
        Key::F8 => K::F8,
        Key::F9 => K::F9,
        Key::F10 => K::F10,
        Key::F11 => K::F11,
        Key::F12 => K::F12,
        Key::Slash => K::Slash,
        Key::Backslash => K::BackSlash,
        Key::Comma => K::Comma,
        Key::Period => K::Dot,
        Key::Minus => K::Minus,
        Key::Equal => K::Equal,
        Key::Semicolon => K::SemiColon,
        Key::Quote => K::Quote,
        Key::Grave => K::BackQuote,
        Key::LeftBracket => K::LeftBracket,
        Key::RightBracket => K::RightBracket,
        Key::CapsLock => K::CapsLock,
        Key::NumLock => K::NumLock,
        Key::ScrollLock => K::ScrollLock,
        Key::PrintScreen => K::PrintScreen,
        Key::Pause => K::Pause,
        Key::Menu
        | Key::VolumeUp
        | Key::VolumeDown
        | Key::VolumeMute
        | Key::AudioPlay
        | Key::AudioStop
        | Key::AudioNext
        | Key::AudioPrev => {
            return Err(ActionError::Unsupported(format!(
                "{key} has no native key code"
            )))
        }
    };
    Ok(mapped)
}

/// Key to tap for `c`, and whether Shift must be held.
fn char_key(c: char) -> Option<(rdev::Key, bool)> {
    use rdev::Key as K;

    const LETTERS: [rdev::Key; 26] = [
        K::KeyA, K::KeyB, K::KeyC, K::KeyD, K::KeyE, K::KeyF, K::KeyG, K::KeyH, K::KeyI,
        K::KeyJ, K::KeyK, K::KeyL, K::KeyM, K::KeyN, K::KeyO, K::KeyP, K::KeyQ, K::KeyR,
        K::KeyS, K::KeyT, K::KeyU, K::KeyV, K::KeyW, K::KeyX, K::KeyY, K::KeyZ,
    ];
    const DIGITS: [rdev::Key; 10] = [
        K::Num0, K::Num1, K::Num2, K::Num3, K::Num4, K::Num5, K::Num6, K::Num7, K::Num8, K::Num9,
    ];

    let plain = |key| Some((key, false));
    match c {
        'a'..='z' => plain(LETTERS[(c as u8 - b'a') as usize]),
        'A'..='Z' => Some((LETTERS[(c as u8 - b'A') as usize], true)),
        '0'..='9' => plain(DIGITS[(c as u8 - b'0') as usize]),
        ' ' => plain(K::Space),
        '\n' => plain(K::Return),
        '\t' => plain(K::Tab),
        '-' => plain(K::Minus),
        '=' => plain(K::Equal),
        '[' => plain(K::LeftBracket),
        ']' => plain(K::RightBracket),
        ';' => plain(K::SemiColon),
        '\'' => plain(K::Quote),
        '`' => plain(K::BackQuote),
        '\\' => plain(K::BackSlash),
        ',' => plain(K::Comma),
        '.' => plain(K::Dot),
        '/' => plain(K::Slash),
        _ => None,
    }
}

#[async_trait]
impl InputDevice for NativeInputDevice {
    async fn move_pointer(&mut self, x: i32, y: i32) -> Result<(), ActionError> {
        Self::send(EventType::MouseMove {
            x: f64::from(x),
            y: f64::from(y),
        })
    }

    async fn click(&mut self, button: MouseButton) -> Result<(), ActionError> {
        let button = match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
            MouseButton::Middle => Button::Middle,
        };
        Self::send(EventType::ButtonPress(button))?;
        Self::send(EventType::ButtonRelease(button))
    }

    async fn scroll(&mut self, direction: ScrollDirection, amount: u32) -> Result<(), ActionError> {
        let amount = i64::from(amount);
        let (delta_x, delta_y) = match direction {
            ScrollDirection::Up => (0, amount),
            ScrollDirection::Down => (0, -amount),
            ScrollDirection::Left => (-amount, 0),
            ScrollDirection::Right => (amount, 0),
        };
        Self::send(EventType::Wheel { delta_x, delta_y })
    }

    async fn key_down(&mut self, key: Key) -> Result<(), ActionError> {
        Self::send(EventType::KeyPress(native_key(key)?))
    }

    async fn key_up(&mut self, key: Key) -> Result<(), ActionError> {
        Self::send(EventType::KeyRelease(native_key(key)?))
    }

    async fn type_char(&mut self, c: char) -> Result<(), ActionError> {
        let (key, shifted) = char_key(c)
            .ok_or_else(|| ActionError::Unsupported(format!("cannot type {c:?} natively")))?;
        if !shifted {
            return Self::tap(key);
        }
        Self::send(EventType::KeyPress(rdev::Key::ShiftLeft))?;
        let typed = Self::tap(key);
        Self::send(EventType::KeyRelease(rdev::Key::ShiftLeft))?;
        typed
    }

    async fn capture_screen(&mut self) -> Result<Vec<u8>, ActionError> {
        let monitors = xcap::Monitor::all()
            .map_err(|e| ActionError::device(format!("failed to list monitors: {e}")))?;
        let mut primary = None;
        for monitor in monitors {
            if monitor
                .is_primary()
                .map_err(|e| ActionError::device(format!("failed to query monitor: {e}")))?
            {
                primary = Some(monitor);
                break;
            }
        }
        let monitor = primary.ok_or_else(|| ActionError::device("no primary monitor"))?;

        let image = monitor
            .capture_image()
            .map_err(|e| ActionError::device(format!("failed to capture screen: {e}")))?;

        let mut png = Vec::new();
        PngEncoder::new(Cursor::new(&mut png))
            .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgba8)
            .map_err(|e| ActionError::device(format!("failed to encode screenshot: {e}")))?;
        Ok(png)
    }
}
