//! Builder configuration.
//!
//! Everything the editor needs to know about its host page (element ids,
//! palette markers, export file naming) plus the history policy knobs.
//! Loaded from JSON handed over by the embedding page; every field is
//! optional and falls back to the defaults below.

use crate::error::Result;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuilderConfig {
    /// Id of the container element that acts as the canvas.
    pub canvas_id: String,

    /// Class marking palette items.
    pub palette_class: String,

    /// `data-*` key on a palette item holding its element type.
    pub palette_data_key: String,

    /// Key the type tag travels under in the drag payload.
    pub drag_payload_key: String,

    /// Id of the singleton custom stylesheet block.
    pub custom_css_id: String,

    pub export_file_name: String,
    pub export_mime: String,

    /// Message shown by the inline edit prompt.
    pub edit_prompt_message: String,

    /// Maximum undo depth. `None` keeps every snapshot.
    pub history_limit: Option<usize>,

    /// Make a completed drag one undoable step. Off by default: only
    /// creation, text edits and imports are recorded.
    pub snapshot_moves: bool,

    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            canvas_id: "canvas".to_string(),
            palette_class: "tool".to_string(),
            palette_data_key: "element".to_string(),
            drag_payload_key: "element".to_string(),
            custom_css_id: "custom-css".to_string(),
            export_file_name: "layout.html".to_string(),
            export_mime: "text/html".to_string(),
            edit_prompt_message: "Edit Text:".to_string(),
            history_limit: None,
            snapshot_moves: false,
            log_level: "info".to_string(),
        }
    }
}

impl BuilderConfig {
    /// Parse a JSON configuration object. An empty string yields the defaults.
    ///
    /// # Errors
    /// Returns `BuilderError::InvalidConfig` if the JSON is malformed or a
    /// field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Configured log level; unknown names fall back to `Info`.
    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}
