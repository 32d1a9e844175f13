//! Desktop command vocabulary

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::input::{InputDevice, MouseButton, ScrollDirection, SharedInputDevice};
use super::keys::{Chord, Key};
use super::launcher::{LaunchRequest, Launcher, Platform};
use super::{pause_ms, resolve_path, write_output, ActionTiming};
use crate::error::ActionError;
use crate::plan::ArgValue;
use crate::registry::{ActionHandler, ActionOutcome, ActionRegistry, Args};

/// Commands bound by [`DesktopActions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopCommand {
    RunAppByName,
    LaunchApp,
    OpenUrl,
    OpenFolder,
    OpenFile,
    FocusWindow,
    TypeText,
    PressKey,
    MoveTo,
    ClickAt,
    Wait,
    Scroll,
    CopyClipboard,
    PasteClipboard,
    MinimizeWindow,
    SwitchApp,
    LockWorkstation,
    MediaControl,
    PlayVideo,
    PauseVideo,
    CloseVideo,
    TakeScreenshot,
    AdjustVolume,
}

impl DesktopCommand {
    pub const ALL: [DesktopCommand; 23] = [
        DesktopCommand::RunAppByName,
        DesktopCommand::LaunchApp,
        DesktopCommand::OpenUrl,
        DesktopCommand::OpenFolder,
        DesktopCommand::OpenFile,
        DesktopCommand::FocusWindow,
        DesktopCommand::TypeText,
        DesktopCommand::PressKey,
        DesktopCommand::MoveTo,
        DesktopCommand::ClickAt,
        DesktopCommand::Wait,
        DesktopCommand::Scroll,
        DesktopCommand::CopyClipboard,
        DesktopCommand::PasteClipboard,
        DesktopCommand::MinimizeWindow,
        DesktopCommand::SwitchApp,
        DesktopCommand::LockWorkstation,
        DesktopCommand::MediaControl,
        DesktopCommand::PlayVideo,
        DesktopCommand::PauseVideo,
        DesktopCommand::CloseVideo,
        DesktopCommand::TakeScreenshot,
        DesktopCommand::AdjustVolume,
    ];

    /// Name used in plans.
    pub fn name(self) -> &'static str {
        match self {
            DesktopCommand::RunAppByName => "runAppByName",
            DesktopCommand::LaunchApp => "launchApp",
            DesktopCommand::OpenUrl => "openUrl",
            DesktopCommand::OpenFolder => "openFolder",
            DesktopCommand::OpenFile => "openFile",
            DesktopCommand::FocusWindow => "focusWindow",
            DesktopCommand::TypeText => "typeText",
            DesktopCommand::PressKey => "pressKey",
            DesktopCommand::MoveTo => "moveTo",
            DesktopCommand::ClickAt => "clickAt",
            DesktopCommand::Wait => "wait",
            DesktopCommand::Scroll => "scroll",
            DesktopCommand::CopyClipboard => "copyClipboard",
            DesktopCommand::PasteClipboard => "pasteClipboard",
            DesktopCommand::MinimizeWindow => "minimizeWindow",
            DesktopCommand::SwitchApp => "switchApp",
            DesktopCommand::LockWorkstation => "lockWorkstation",
            DesktopCommand::MediaControl => "mediaControl",
            DesktopCommand::PlayVideo => "playVideo",
            DesktopCommand::PauseVideo => "pauseVideo",
            DesktopCommand::CloseVideo => "closeVideo",
            DesktopCommand::TakeScreenshot => "takeScreenshot",
            DesktopCommand::AdjustVolume => "adjustVolume",
        }
    }
}

/// Desktop actions over a shared input device and a process launcher.
pub struct DesktopActions {
    device: SharedInputDevice,
    launcher: Arc<dyn Launcher>,
    timing: ActionTiming,
    working_dir: PathBuf,
    platform: Platform,
}

impl DesktopActions {
    pub fn new(device: SharedInputDevice, launcher: Arc<dyn Launcher>, timing: ActionTiming) -> Self {
        Self {
            device,
            launcher,
            timing,
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            platform: Platform::current(),
        }
    }

    /// Base directory for relative `openFile` and `takeScreenshot` paths.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Register a handler for every [`DesktopCommand`].
    pub fn register(self, registry: &mut ActionRegistry) {
        let actions = Arc::new(self);
        for command in DesktopCommand::ALL {
            registry.register(
                command.name(),
                DesktopHandler {
                    command,
                    actions: actions.clone(),
                },
            );
        }
        info!(commands = DesktopCommand::ALL.len(), "Registered desktop actions");
    }

    pub async fn run(&self, command: DesktopCommand, values: &[ArgValue]) -> ActionOutcome {
        let args = Args::new(command.name(), values);
        let timing = &self.timing;

        match command {
            DesktopCommand::RunAppByName => {
                let name = args.string(0)?;
                let wait = wait_arg(&args, 1, timing.launch_wait_ms)?;
                self.run_app_by_name(&name).await?;
                pause_ms(wait).await;
            }
            DesktopCommand::LaunchApp => {
                let wait = wait_arg(&args, 1, timing.launch_wait_ms)?;
                self.launch(LaunchRequest::shell(args.string(0)?), wait).await?;
            }
            DesktopCommand::OpenUrl => {
                let wait = wait_arg(&args, 1, timing.url_wait_ms)?;
                self.launch(LaunchRequest::open(self.platform, &args.string(0)?), wait)
                    .await?;
            }
            DesktopCommand::OpenFolder => {
                let wait = wait_arg(&args, 1, timing.launch_wait_ms)?;
                let dir = resolve_path(&self.working_dir, &args.string(0)?);
                let request = LaunchRequest::open_folder(self.platform, &dir.to_string_lossy());
                self.launch(request, wait).await?;
            }
            DesktopCommand::OpenFile => {
                let wait = wait_arg(&args, 1, timing.launch_wait_ms)?;
                let file = resolve_path(&self.working_dir, &args.string(0)?);
                let request = LaunchRequest::open(self.platform, &file.to_string_lossy());
                self.launch(request, wait).await?;
            }
            DesktopCommand::FocusWindow => {
                let wait = wait_arg(&args, 1, timing.focus_wait_ms)?;
                let request = LaunchRequest::focus_window(self.platform, &args.string(0)?);
                self.launch(request, wait).await?;
            }
            DesktopCommand::TypeText => self.type_text(&args.string(0)?).await?,
            DesktopCommand::PressKey => self.press(&Chord::parse(&args.string(0)?)?).await?,
            DesktopCommand::MoveTo => {
                let (x, y) = (coordinate(&args, 0)?, coordinate(&args, 1)?);
                self.device.lock().await.move_pointer(x, y).await?;
                pause_ms(timing.move_settle_ms).await;
            }
            DesktopCommand::ClickAt => {
                let (x, y) = (coordinate(&args, 0)?, coordinate(&args, 1)?);
                let button = match args.get(2) {
                    Some(value) => MouseButton::from_name(&value.to_string()).ok_or_else(|| {
                        ActionError::invalid(format!("clickAt: unknown mouse button {}", value))
                    })?,
                    None => MouseButton::Left,
                };
                {
                    let mut device = self.device.lock().await;
                    device.move_pointer(x, y).await?;
                    device.click(button).await?;
                }
                pause_ms(timing.click_settle_ms).await;
            }
            DesktopCommand::Wait => pause_ms(millis(&args, 0)?).await,
            DesktopCommand::Scroll => {
                let dx = args.number_or(0, 0.0)?;
                let dy = args.number_or(1, 0.0)?;
                self.scroll(dx, dy).await?;
                pause_ms(timing.scroll_settle_ms).await;
            }
            DesktopCommand::CopyClipboard => self.press(&self.shortcut('c')).await?,
            DesktopCommand::PasteClipboard => self.press(&self.shortcut('v')).await?,
            DesktopCommand::CloseVideo => self.press(&self.shortcut('w')).await?,
            DesktopCommand::MinimizeWindow => {
                let chord = match self.platform {
                    Platform::MacOs => self.shortcut('m'),
                    _ => Chord {
                        keys: vec![Key::MetaLeft, Key::ArrowDown],
                        chars: Vec::new(),
                    },
                };
                self.press(&chord).await?;
            }
            DesktopCommand::SwitchApp => {
                let modifier = match self.platform {
                    Platform::MacOs => Key::MetaLeft,
                    _ => Key::AltLeft,
                };
                self.press(&Chord {
                    keys: vec![modifier, Key::Tab],
                    chars: Vec::new(),
                })
                .await?;
            }
            DesktopCommand::LockWorkstation => {
                self.launch(LaunchRequest::lock_workstation(self.platform), 0)
                    .await?;
            }
            DesktopCommand::MediaControl => self.press(&media_chord(&args.string(0)?)?).await?,
            DesktopCommand::PlayVideo => self.press(&media_chord("play")?).await?,
            DesktopCommand::PauseVideo => self.press(&media_chord("pause")?).await?,
            DesktopCommand::TakeScreenshot => {
                let path = match args.get(0) {
                    Some(_) => args.string(0)?,
                    None => format!("screenshot-{}.png", Uuid::new_v4()),
                };
                return self.take_screenshot(&path).await.map(Some);
            }
            DesktopCommand::AdjustVolume => {
                let key = match args.string_or(0, "up").trim().to_ascii_lowercase().as_str() {
                    "up" => Key::VolumeUp,
                    "down" => Key::VolumeDown,
                    other => {
                        return Err(ActionError::invalid(format!(
                            "adjustVolume: direction must be up or down, got {}",
                            other
                        )))
                    }
                };
                // zero presses once
                let steps = count(args.number_or(1, 1.0)?, "adjustVolume: amount")?.max(1);
                for _ in 0..steps {
                    self.press(&Chord::single(key)).await?;
                }
            }
        }

        Ok(None)
    }

    /// Primary-modifier shortcut: Cmd on macOS, Ctrl elsewhere.
    fn shortcut(&self, c: char) -> Chord {
        let modifier = match self.platform {
            Platform::MacOs => Key::MetaLeft,
            _ => Key::ControlLeft,
        };
        Chord {
            keys: vec![modifier],
            chars: vec![c],
        }
    }

    async fn launch(&self, request: LaunchRequest, wait_ms: u64) -> Result<(), ActionError> {
        self.launcher.launch(&request).await?;
        pause_ms(wait_ms).await;
        Ok(())
    }

    async fn run_app_by_name(&self, name: &str) -> Result<(), ActionError> {
        let launcher = match self.platform {
            Platform::MacOs => Chord {
                keys: vec![Key::MetaLeft, Key::Space],
                chars: Vec::new(),
            },
            _ => Chord::single(Key::LeftSuper),
        };
        self.press(&launcher).await?;
        pause_ms(self.timing.start_menu_delay_ms).await;
        self.type_text(name).await?;
        self.press(&Chord::single(Key::Enter)).await
    }

    async fn press(&self, chord: &Chord) -> Result<(), ActionError> {
        {
            let mut device = self.device.lock().await;
            press_chord(&mut *device, chord).await?;
        }
        pause_ms(self.timing.key_delay_ms).await;
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<(), ActionError> {
        let mut device = self.device.lock().await;
        for c in text.chars() {
            if c == ' ' {
                press_chord(&mut *device, &Chord::single(Key::Space)).await?;
            } else {
                device.type_char(c).await?;
            }
            pause_ms(self.timing.type_delay_ms).await;
        }
        Ok(())
    }

    async fn scroll(&self, dx: f64, dy: f64) -> Result<(), ActionError> {
        let mut device = self.device.lock().await;
        let vertical = if dy >= 0.0 { ScrollDirection::Up } else { ScrollDirection::Down };
        let horizontal = if dx >= 0.0 { ScrollDirection::Right } else { ScrollDirection::Left };

        let dy = count(dy.abs(), "scroll: dy")?;
        if dy > 0 {
            device.scroll(vertical, dy).await?;
        }
        let dx = count(dx.abs(), "scroll: dx")?;
        if dx > 0 {
            device.scroll(horizontal, dx).await?;
        }
        Ok(())
    }

    async fn take_screenshot(&self, path: &str) -> Result<String, ActionError> {
        let full = resolve_path(&self.working_dir, path);
        let png = self.device.lock().await.capture_screen().await?;
        write_output(&full, &png).await?;
        Ok(format!("Screenshot saved to {}", full.display()))
    }
}

struct DesktopHandler {
    command: DesktopCommand,
    actions: Arc<DesktopActions>,
}

#[async_trait]
impl ActionHandler for DesktopHandler {
    async fn invoke(&self, args: &[ArgValue]) -> ActionOutcome {
        self.actions.run(self.command, args).await
    }
}

async fn press_chord(device: &mut dyn InputDevice, chord: &Chord) -> Result<(), ActionError> {
    for key in &chord.keys {
        device.key_down(*key).await?;
    }
    for c in &chord.chars {
        device.type_char(*c).await?;
    }
    for key in chord.keys.iter().rev() {
        device.key_up(*key).await?;
    }
    Ok(())
}

fn media_chord(action: &str) -> Result<Chord, ActionError> {
    let chord = match action.trim().to_ascii_lowercase().as_str() {
        "play" | "pause" => Chord::single(Key::Space),
        "fullscreen" => Chord::single(Key::F11),
        "exitfullscreen" => Chord::single(Key::Escape),
        "mute" => Chord {
            keys: Vec::new(),
            chars: vec!['m'],
        },
        "next" => Chord::single(Key::PageDown),
        "previous" => Chord::single(Key::PageUp),
        _ => {
            return Err(ActionError::invalid(format!(
                "Unknown media action: {}",
                action
            )))
        }
    };
    Ok(chord)
}

fn coordinate(args: &Args<'_>, index: usize) -> Result<i32, ActionError> {
    let value = args.number(index)?;
    if !value.is_finite() || value.abs() > i32::MAX as f64 {
        return Err(ActionError::invalid(format!(
            "coordinate {} is out of range",
            value
        )));
    }
    Ok(value.round() as i32)
}

fn count(value: f64, what: &str) -> Result<u32, ActionError> {
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(ActionError::invalid(format!(
            "{} must be a non-negative number, got {}",
            what, value
        )));
    }
    Ok(value.round() as u32)
}

fn millis(args: &Args<'_>, index: usize) -> Result<u64, ActionError> {
    let value = args.number(index)?;
    if !value.is_finite() || value < 0.0 {
        return Err(ActionError::invalid(format!(
            "wait: duration must be a non-negative number of milliseconds, got {}",
            value
        )));
    }
    Ok(value.round() as u64)
}

fn wait_arg(args: &Args<'_>, index: usize, default_ms: u64) -> Result<u64, ActionError> {
    if args.get(index).is_none() {
        return Ok(default_ms);
    }
    millis(args, index)
}
