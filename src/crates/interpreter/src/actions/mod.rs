//! Built-in action handlers
//!
//! - [`DesktopActions`] binds the desktop command vocabulary (`clickAt`,
//!   `typeText`, `openUrl`, ...) to an [`InputDevice`] and a [`Launcher`].
//! - [`BrowserActions`] binds the browser vocabulary (`navigate`,
//!   `extractTable`, ...) to a [`BrowserSession`].

pub mod browser;
pub mod desktop;
pub mod input;
pub mod keys;
pub mod launcher;
#[cfg(feature = "native-input")]
pub mod native;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use browser::{BrowserActions, BrowserCommand, BrowserSession};
pub use desktop::{DesktopActions, DesktopCommand};
pub use input::{
    InputDevice, InputEvent, MouseButton, RecordingInputDevice, ScrollDirection, SharedInputDevice,
    UnavailableInputDevice,
};
#[cfg(feature = "native-input")]
pub use native::NativeInputDevice;
pub use keys::{Chord, Key};
pub use launcher::{LaunchRequest, Launcher, Platform, RecordingLauncher, SystemLauncher};

/// Delays applied around primitive actions, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionTiming {
    /// After each `pressKey` chord
    pub key_delay_ms: u64,
    /// After each character typed by `typeText`
    pub type_delay_ms: u64,
    pub move_settle_ms: u64,
    pub click_settle_ms: u64,
    pub scroll_settle_ms: u64,
    /// Between opening the start menu and typing in `runAppByName`
    pub start_menu_delay_ms: u64,
    /// After `runAppByName`, `launchApp`, `openFolder` and `openFile`
    pub launch_wait_ms: u64,
    pub url_wait_ms: u64,
    pub focus_wait_ms: u64,
}

impl Default for ActionTiming {
    fn default() -> Self {
        Self {
            key_delay_ms: 50,
            type_delay_ms: 50,
            move_settle_ms: 50,
            click_settle_ms: 100,
            scroll_settle_ms: 50,
            start_menu_delay_ms: 200,
            launch_wait_ms: 2000,
            url_wait_ms: 3000,
            focus_wait_ms: 500,
        }
    }
}

impl ActionTiming {
    /// No delays at all.
    pub fn immediate() -> Self {
        Self {
            key_delay_ms: 0,
            type_delay_ms: 0,
            move_settle_ms: 0,
            click_settle_ms: 0,
            scroll_settle_ms: 0,
            start_menu_delay_ms: 0,
            launch_wait_ms: 0,
            url_wait_ms: 0,
            focus_wait_ms: 0,
        }
    }
}

pub(crate) async fn pause_ms(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Resolve `path` against `base` unless it is already absolute.
pub(crate) fn resolve_path(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Write `bytes` to `path`, creating missing parent directories.
pub(crate) async fn write_output(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = ActionTiming::default();
        assert_eq!(timing.launch_wait_ms, 2000);
        assert_eq!(timing.url_wait_ms, 3000);
        assert_eq!(timing.click_settle_ms, 100);
    }

    #[test]
    fn test_partial_timing_from_yaml() {
        let timing: ActionTiming = serde_yaml::from_str("url_wait_ms: 10\n").unwrap();
        assert_eq!(timing.url_wait_ms, 10);
        assert_eq!(timing.launch_wait_ms, 2000);
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/work");
        assert_eq!(resolve_path(base, "shot.png"), PathBuf::from("/work/shot.png"));
        assert_eq!(resolve_path(base, "/tmp/shot.png"), PathBuf::from("/tmp/shot.png"));
    }
}
