//! Starting external programs: apps, URLs, folders, window focus

use std::process::Stdio;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ActionError;

/// Host operating system family, used to choose openers and shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Platform {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

/// A program invocation. With `shell` set, `program` is a whole command line
/// handed to the platform shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchRequest {
    pub program: String,
    pub args: Vec<String>,
    pub shell: bool,
}

impl LaunchRequest {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            shell: false,
        }
    }

    pub fn shell(command_line: impl Into<String>) -> Self {
        Self {
            program: command_line.into(),
            args: Vec::new(),
            shell: true,
        }
    }

    /// Open a URL, file or folder with the platform's default handler.
    pub fn open(platform: Platform, target: &str) -> Self {
        match platform {
            Platform::Windows => Self::new(
                "cmd",
                // `start` takes its first quoted argument as the window title
                vec!["/c".into(), "start".into(), String::new(), target.into()],
            ),
            Platform::MacOs => Self::new("open", vec![target.into()]),
            Platform::Linux => Self::new("xdg-open", vec![target.into()]),
        }
    }

    /// Open a folder in the file manager.
    pub fn open_folder(platform: Platform, dir: &str) -> Self {
        match platform {
            Platform::Windows => Self::new("explorer", vec![dir.into()]),
            _ => Self::open(platform, dir),
        }
    }

    /// Bring a window whose title contains `title` to the front.
    pub fn focus_window(platform: Platform, title: &str) -> Self {
        match platform {
            Platform::Windows => Self::new(
                "powershell",
                vec![
                    "-NoProfile".into(),
                    "-Command".into(),
                    format!(
                        "(New-Object -ComObject WScript.Shell).AppActivate('{}')",
                        title.replace('\'', "''")
                    ),
                ],
            ),
            Platform::MacOs => Self::new(
                "osascript",
                vec![
                    "-e".into(),
                    format!(
                        "tell application \"{}\" to activate",
                        title.replace('"', "\\\"")
                    ),
                ],
            ),
            Platform::Linux => Self::new("wmctrl", vec!["-a".into(), title.into()]),
        }
    }

    pub fn lock_workstation(platform: Platform) -> Self {
        match platform {
            Platform::Windows => Self::new("rundll32.exe", vec!["user32.dll,LockWorkStation".into()]),
            Platform::MacOs => Self::new("pmset", vec!["displaysleepnow".into()]),
            Platform::Linux => Self::new("loginctl", vec!["lock-session".into()]),
        }
    }

    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Starts detached processes.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, request: &LaunchRequest) -> Result<(), ActionError>;
}

/// Spawns real processes without waiting for them to exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

#[async_trait]
impl Launcher for SystemLauncher {
    async fn launch(&self, request: &LaunchRequest) -> Result<(), ActionError> {
        let mut command = if request.shell {
            shell_command(&request.program)
        } else {
            let mut command = tokio::process::Command::new(&request.program);
            command.args(&request.args);
            command
        };

        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = command
            .spawn()
            .map_err(|e| ActionError::Launch(format!("{}: {}", request.display(), e)))?;

        info!(command = %request.display(), pid = ?child.id(), "Launched process");
        Ok(())
    }
}

fn shell_command(command_line: &str) -> tokio::process::Command {
    if cfg!(target_os = "windows") {
        let mut command = tokio::process::Command::new("cmd");
        command.args(["/C", command_line]);
        command
    } else {
        let mut command = tokio::process::Command::new("sh");
        command.args(["-c", command_line]);
        command
    }
}

/// Records launch requests without starting anything.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    launched: Mutex<Vec<LaunchRequest>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched(&self) -> Vec<LaunchRequest> {
        self.launched.lock().clone()
    }
}

#[async_trait]
impl Launcher for RecordingLauncher {
    async fn launch(&self, request: &LaunchRequest) -> Result<(), ActionError> {
        debug!(command = %request.display(), "Launch (dry run)");
        self.launched.lock().push(request.clone());
        Ok(())
    }
}
