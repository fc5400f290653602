//! Best-effort interactive display of written images.
//!
//! Images are handed to the platform viewer. Nothing here can fail a run:
//! a missing graphical session is skipped and viewer errors become warnings.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::obs::emit_display_failed;

/// Platform viewer command, or `None` when no graphical session is present.
pub fn viewer_command() -> Option<&'static str> {
    if cfg!(target_os = "macos") {
        Some("open")
    } else if cfg!(target_os = "windows") {
        Some("explorer")
    } else if std::env::var_os("DISPLAY").is_some()
        || std::env::var_os("WAYLAND_DISPLAY").is_some()
    {
        Some("xdg-open")
    } else {
        None
    }
}

/// Open each image in the platform viewer.
pub fn show_images(paths: &[&Path]) {
    let Some(viewer) = viewer_command() else {
        debug!("no graphical session detected; skipping display");
        return;
    };

    for path in paths {
        let spawned = Command::new(viewer)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(e) = spawned {
            emit_display_failed(path, &e);
        }
    }
}
