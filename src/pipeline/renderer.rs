use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::generator::GiftEntry;

/// Literal substring in the HTML template marking where the generated JSON is
/// injected.
pub const PLACEHOLDER: &str = "___GIFTS_DATA___";

/// Read the HTML template. A missing template is fatal — there is nothing to
/// render without it.
pub fn load_template(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read template '{}'", path.display()))
}

/// Substitute the gift array into the template. One literal replacement, no
/// HTML escaping; if the placeholder is absent the template passes through
/// unchanged.
pub fn render(template: &str, gifts: &[GiftEntry]) -> Result<String> {
    let gifts_json = serde_json::to_string(gifts).context("failed to serialize gift entries")?;
    Ok(template.replace(PLACEHOLDER, &gifts_json))
}

/// Write the rendered page to `<dir>/<prefix>_<YYYYMMDDHHMMSS>.html`. The
/// second-resolution timestamp keeps names unique across runs; two runs in
/// the same second would collide. A write failure is logged and swallowed —
/// the run ends without a visible error beyond the log line.
pub fn write_page(dir: &Path, prefix: &str, content: &str) -> Option<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    let path = dir.join(format!("{}_{}.html", prefix, timestamp));

    match fs::write(&path, content) {
        Ok(()) => {
            info!("Wrote rendered page to {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!(
                "An error occurred while writing to the file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}
