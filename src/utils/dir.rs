use std::{
    env, io,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};

const APPLICATION_DIR: &str = "github-activity";

/// Returns (and creates) the directory where the application keeps its logs.
pub fn create_application_default_path() -> Result<PathBuf> {
    ensure_dir(platform_base_dir()?.join(APPLICATION_DIR))
}

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        fn platform_base_dir() -> Result<PathBuf> {
            env::var_os("APPDATA")
                .map(PathBuf::from)
                .ok_or_else(|| anyhow!("APPDATA should be present on Windows"))
        }
    } else {
        fn platform_base_dir() -> Result<PathBuf> {
            state_home(
                env::var_os("XDG_STATE_HOME").map(PathBuf::from),
                env::var_os("HOME").map(PathBuf::from),
            )
            .ok_or_else(|| anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME"))
        }
    }
}

/// XDG state directory resolution. An empty XDG_STATE_HOME counts as unset.
#[cfg_attr(windows, allow(dead_code))]
fn state_home(xdg_state_home: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    xdg_state_home
        .filter(|v| !v.as_os_str().is_empty())
        .or_else(|| home.map(|home| home.join(".local/state")))
}

pub fn ensure_dir(path: PathBuf) -> Result<PathBuf> {
    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

pub fn logs_dir(application_dir: &Path) -> Result<PathBuf> {
    ensure_dir(application_dir.join("logs"))
}
