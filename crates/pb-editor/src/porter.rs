//! Layout export / import.
//!
//! The file format is the raw canvas markup: no header, no schema. Import
//! itself is a `Command::Import` dispatched through the session; reading
//! the file is the host's job.

use pb_core::{BuilderConfig, Canvas, emit_canvas};
use serde::Serialize;

/// A layout ready to hand to the browser as a download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedLayout {
    pub file_name: String,
    pub mime: String,
    pub contents: String,
}

pub fn export_layout(canvas: &Canvas, config: &BuilderConfig) -> ExportedLayout {
    ExportedLayout {
        file_name: config.export_file_name.clone(),
        mime: config.export_mime.clone(),
        contents: emit_canvas(canvas),
    }
}
