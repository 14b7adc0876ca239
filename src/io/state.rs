use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted dashboard view state (written to .state.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Displayed month as `YYYY-MM`
    #[serde(default)]
    pub month: Option<String>,
    /// Active filter name ("all", "today", "date", "active", "completed")
    #[serde(default)]
    pub filter: Option<String>,
    /// Selected day for the "date" filter, `YYYY-MM-DD`
    #[serde(default)]
    pub selected_date: Option<String>,
    /// Id of the task under the cursor
    #[serde(default)]
    pub cursor_id: Option<String>,
}

/// Read .state.json from the folio directory
pub fn read_ui_state(folio_dir: &Path) -> Option<UiState> {
    let path = folio_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the folio directory
pub fn write_ui_state(folio_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = folio_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
