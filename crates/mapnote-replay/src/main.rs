//! Headless session replay.
//!
//! Reads a JSON script of editing steps, runs it through an [`Editor`], logs
//! every bus event and prints the final snapshot.
//!
//! Saves go to memory unless the script names a `storageDir`, or sets
//! `"persist": true` to use the platform data directory.
//!
//! ```json
//! {
//!   "config": { "gridSize": 20 },
//!   "storageDir": "/tmp/mapnote",
//!   "steps": [
//!     { "action": "tool", "tool": "rectangle" },
//!     { "action": "input", "event": { "type": "pointerDown", "x": 12, "y": 12 } },
//!     { "action": "input", "event": { "type": "pointerUp", "x": 47, "y": 83 } },
//!     { "action": "undo" },
//!     { "action": "save" }
//!   ]
//! }
//! ```

use mapnote_core::storage::create_default_storage;
use mapnote_core::{
    Editor, EditorConfig, FileStorage, InputEvent, LayerId, MemoryStorage, Storage, StorageError, ToolKind,
    ToolSettings,
};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
enum ReplayError {
    #[error("usage: mapnote-replay <script.json | ->")]
    Usage,
    #[error("cannot read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Script {
    #[serde(default)]
    config: EditorConfig,
    #[serde(default)]
    storage_dir: Option<PathBuf>,
    #[serde(default)]
    persist: bool,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
enum Step {
    Input { event: InputEvent },
    Tool { tool: ToolKind },
    Settings { settings: ToolSettings },
    AddLayer { name: String },
    ActivateLayer { id: String },
    RemoveLayer { id: String },
    Rename { name: String },
    Undo,
    Redo,
    Save,
    Autosave,
    Revert { index: usize },
}

fn read_script(path: &str) -> Result<Script, ReplayError> {
    let text = if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&text)?)
}

fn open_storage(script: &Script) -> Result<Arc<dyn Storage>, ReplayError> {
    let storage: Arc<dyn Storage> = match (&script.storage_dir, script.persist) {
        (Some(dir), _) => Arc::new(FileStorage::new(dir.clone())?),
        (None, true) => create_default_storage()?,
        (None, false) => Arc::new(MemoryStorage::new()),
    };
    Ok(storage)
}

async fn replay(editor: &mut Editor, steps: Vec<Step>) {
    for (index, step) in steps.into_iter().enumerate() {
        log::debug!("step {}: {:?}", index, step);
        match step {
            Step::Input { event } => editor.handle_input(event),
            Step::Tool { tool } => {
                editor.set_tool(tool);
            }
            Step::Settings { settings } => editor.set_tool_settings(settings),
            Step::AddLayer { name } => {
                let id = editor.add_layer(name);
                editor.set_active_layer(&id);
            }
            Step::ActivateLayer { id } => {
                editor.set_active_layer(&LayerId::new(id));
            }
            Step::RemoveLayer { id } => {
                editor.remove_layer(&LayerId::new(id));
            }
            Step::Rename { name } => {
                editor.update_settings(|s| s.name = name);
            }
            Step::Undo => {
                editor.undo();
            }
            Step::Redo => {
                editor.redo();
            }
            Step::Save => {
                editor.save().await;
            }
            Step::Autosave => {
                editor.autosave_tick().await;
            }
            Step::Revert { index } => {
                editor.revert_to_version(index);
            }
        }
    }
}

fn run() -> Result<(), ReplayError> {
    let path = std::env::args().nth(1).ok_or(ReplayError::Usage)?;
    let script = read_script(&path)?;
    let storage = open_storage(&script)?;

    let mut editor = Editor::new(script.config, storage);
    editor.bus().on_any(|event| {
        match serde_json::to_string(event) {
            Ok(json) => log::info!("{} {}", event.name(), json),
            Err(_) => log::info!("{}", event.name()),
        }
        Ok(())
    });

    pollster::block_on(replay(&mut editor, script.steps));

    println!("{}", editor.snapshot().to_json()?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_replays_rectangle() {
        let script: Script = serde_json::from_str(
            r#"{
                "config": { "gridSize": 20 },
                "steps": [
                    { "action": "tool", "tool": "rectangle" },
                    { "action": "input", "event": { "type": "pointerDown", "x": 12, "y": 12 } },
                    { "action": "input", "event": { "type": "pointerMove", "x": 47, "y": 83 } },
                    { "action": "input", "event": { "type": "pointerUp", "x": 47, "y": 83 } },
                    { "action": "rename", "name": "Yard" },
                    { "action": "undo" },
                    { "action": "save" }
                ]
            }"#,
        )
        .unwrap();

        let mut editor = Editor::in_memory(script.config);
        pollster::block_on(replay(&mut editor, script.steps));

        let snapshot = editor.snapshot();
        assert_eq!(snapshot.elements.len(), 1);
        assert_eq!(snapshot.project.name, "Untitled");
        assert_eq!(snapshot.project.version, 1);
    }

    #[test]
    fn test_storage_dir_persists_saves() {
        let dir = tempfile::tempdir().unwrap();
        let script: Script = serde_json::from_value(serde_json::json!({
            "storageDir": dir.path(),
            "steps": [
                { "action": "rename", "name": "Depot" },
                { "action": "save" }
            ]
        }))
        .unwrap();

        let storage = open_storage(&script).unwrap();
        let mut editor = Editor::new(script.config, Arc::clone(&storage));
        pollster::block_on(replay(&mut editor, script.steps));

        let id = editor.project().id.clone();
        assert!(pollster::block_on(storage.exists(&id)).unwrap());
        let loaded = pollster::block_on(storage.load(&id)).unwrap();
        assert_eq!(loaded.project.name, "Depot");
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let parsed = serde_json::from_str::<Script>(r#"{ "steps": [ { "action": "explode" } ] }"#);
        assert!(parsed.is_err());
    }
}
