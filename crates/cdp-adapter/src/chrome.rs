//! Locating a Chromium-family browser to launch

use std::path::{Path, PathBuf};

use which::which;

/// Env var naming the browser binary explicitly.
pub const CHROME_ENV: &str = "OVERLAY_PILOT_CHROME";

const PATH_NAMES: &[&str] = if cfg!(windows) {
    &["chrome.exe", "msedge.exe"]
} else {
    &["google-chrome-stable", "google-chrome", "chromium", "chromium-browser"]
};

const INSTALL_PATHS: &[&str] = if cfg!(target_os = "macos") {
    &[
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ]
} else if cfg!(windows) {
    &[
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
    ]
} else {
    &["/usr/bin/google-chrome", "/usr/bin/chromium", "/snap/bin/chromium"]
};

/// First usable browser: the env override if it points at a file, then
/// `PATH`, then the usual install locations.
pub(crate) fn locate(env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    let explicit = env(CHROME_ENV)
        .map(|raw| PathBuf::from(raw.trim()))
        .filter(|path| !path.as_os_str().is_empty() && path.is_file());

    explicit
        .or_else(|| PATH_NAMES.iter().find_map(|name| which(name).ok()))
        .or_else(|| {
            INSTALL_PATHS
                .iter()
                .map(Path::new)
                .find(|path| path.is_file())
                .map(Path::to_path_buf)
        })
}
