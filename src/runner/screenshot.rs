use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::browser::capability::Browser;
use crate::browser::error::BrowserError;

/// Keep alphanumerics, spaces, `_` and `-`; everything else becomes `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Local time as `YYYYmmdd_HHMMSS`.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Save the current viewport as `<dir>/<stem>_<timestamp>.png`.
pub fn capture(browser: &mut dyn Browser, dir: &Path, stem: &str) -> Result<PathBuf, BrowserError> {
    fs::create_dir_all(dir)?;
    let png = browser.screenshot_png()?;
    let path = dir.join(format!("{}_{}.png", stem, timestamp()));
    fs::write(&path, png)?;
    debug!("wrote {}", path.display());
    Ok(path)
}

/// Delete `.png` files left in `dir` by an earlier run. Returns how many were
/// removed; a missing directory counts as empty.
pub fn clear_stale(dir: &Path) -> Result<usize, std::io::Error> {
    if !dir.exists() {
        return Ok(0);
    }
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("png") {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}
