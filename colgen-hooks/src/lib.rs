//! Shell commands run after a new scheme has been written, so that running
//! programs pick up the new colors.

use std::env;
use std::ffi::OsStr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

pub const HOOK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hook {
    pub name: &'static str,
    /// Passed to `sh -c`. `{mode}` is replaced with `dark` or `light`.
    pub command: &'static str,
    /// The hook is skipped unless this program is on `PATH`.
    pub check_binary: Option<&'static str>,
}

impl Hook {
    pub fn command_for(&self, mode: &str) -> String {
        self.command.replace("{mode}", mode)
    }
}

pub const DEFAULT_HOOKS: &[Hook] = &[
    Hook {
        name: "hyprland",
        command: "hyprctl reload",
        check_binary: Some("hyprctl"),
    },
    Hook {
        name: "ghostty",
        command: "pkill -SIGUSR2 ghostty",
        check_binary: Some("ghostty"),
    },
    Hook {
        name: "gtk",
        command: "gsettings set org.gnome.desktop.interface gtk-theme \"\"; \
                  gsettings set org.gnome.desktop.interface gtk-theme adw-gtk3-{mode}",
        check_binary: Some("gsettings"),
    },
];

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Hook {name} failed: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Hook {name} timed out after {}s", timeout.as_secs_f32())]
    TimedOut { name: &'static str, timeout: Duration },
}

/// Looks `binary` up in the directories of `$PATH`.
pub fn find_in_path(binary: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    find_in(binary, &path)
}

/// Looks `binary` up in a `PATH`-style list of directories.
pub fn find_in(binary: &str, search_path: &OsStr) -> Option<PathBuf> {
    env::split_paths(search_path)
        .map(|dir| dir.join(binary))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Runs one hook to completion, killing it if it outlives `timeout`.
pub async fn run_hook(hook: &Hook, mode: &str, timeout: Duration) -> Result<Output, HookError> {
    let command = hook.command_for(mode);
    log::debug!("running {} hook: {command}", hook.name);

    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(&command).stdin(Stdio::null()).kill_on_drop(true);

    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(result) => result.map_err(|source| HookError::Spawn {
            name: hook.name,
            source,
        }),
        Err(_) => Err(HookError::TimedOut {
            name: hook.name,
            timeout,
        }),
    }
}

/// Runs `hooks` one after another and returns the names of those that ran.
///
/// Hooks whose binary is missing are skipped. A hook that cannot be spawned
/// or times out is logged and left out of the result; a non-zero exit is
/// logged but still counts as run.
pub async fn run_hooks(hooks: &[Hook], mode: &str, timeout: Duration) -> Vec<&'static str> {
    let mut executed = Vec::new();

    for hook in hooks {
        if let Some(binary) = hook.check_binary {
            if find_in_path(binary).is_none() {
                log::debug!("Skipping {} hook: {binary} not found", hook.name);
                continue;
            }
        }

        match run_hook(hook, mode, timeout).await {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stdout.trim().is_empty() {
                    log::debug!("[{}] {}", hook.name, stdout.trim());
                }
                if !stderr.trim().is_empty() {
                    log::debug!("[{}] stderr: {}", hook.name, stderr.trim());
                }
                if !output.status.success() {
                    log::warn!("Hook {} exited with {}", hook.name, output.status);
                }
                executed.push(hook.name);
            }
            Err(e) => log::error!("{e}"),
        }
    }
    executed
}
