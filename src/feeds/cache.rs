//! Local copies of the feed files.
//!
//! Feeds are read from the data directory. A missing file is fetched from
//! its upstream URL when downloads are enabled.

use colored::Colorize;
use std::error::Error;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Read a feed file, downloading it first if it is missing and `download` is set.
pub fn read_feed(path: &Path, url: &str, download: bool) -> Result<String, Box<dyn Error>> {
    if !path.exists() {
        if !download {
            return Err(format!(
                "Feed file does not exist: {} (fetch it from {url} or pass --download)",
                path.display()
            )
            .into());
        }
        log::warn!("Feed file not found: {}", path.display());
        download_feed(path, url)?;
    }

    log::info!("Reading feed file: {}", path.display());
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading feed file {}: {e}", path.display()))?;
    Ok(text)
}

/// `curl` arguments fetching `url` into `path`; each argument stays whole.
fn curl_args(path: &Path, url: &str) -> Vec<OsString> {
    vec![
        "-sSfL".into(),
        "-o".into(),
        path.as_os_str().to_os_string(),
        url.into(),
    ]
}

fn download_feed(path: &Path, url: &str) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Error creating {}: {e}", dir.display()))?;
    }
    log::info!("Downloading {url} -> {}", path.display());

    let output = Command::new("curl")
        .args(curl_args(path, url))
        .output()
        .map_err(|e| format!("Failed to execute curl: {e}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::warn!("{failed} to download {url}", failed = "failed".on_red());
        log::trace!("code={:?}\n{}", output.status.code(), stderr.red());
        return Err(format!("Download of {url} failed: {}", stderr.trim()).into());
    }
    if !path.exists() {
        return Err(format!("Download of {url} produced no file").into());
    }
    Ok(())
}
