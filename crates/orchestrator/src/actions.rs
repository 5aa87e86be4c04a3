//! Settings actions and transport-neutral menus.

use std::fmt;

use crate::error::OrchestratorError;
use crate::preferences::Engine;

/// A settings change requested by pressing a menu button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    /// Switch the active engine.
    SetEngine(Engine),
    /// Show the list of primary-engine models.
    ShowModels,
    /// Select a catalog model (implies the primary engine).
    SetModel(String),
}

impl SettingsAction {
    /// Parse callback data such as `engine:primary` or `model:flux`.
    pub fn parse(data: &str) -> Result<Self, OrchestratorError> {
        let data = data.trim();
        match data.split_once(':') {
            Some(("engine", "primary")) => Ok(Self::SetEngine(Engine::Primary)),
            Some(("engine", "secondary")) => Ok(Self::SetEngine(Engine::Secondary)),
            Some(("model", key)) if !key.is_empty() => Ok(Self::SetModel(key.to_string())),
            None if data == "models" => Ok(Self::ShowModels),
            _ => Err(OrchestratorError::InvalidAction(data.to_string())),
        }
    }

    /// Encode as callback data understood by [`SettingsAction::parse`].
    pub fn callback_data(&self) -> String {
        match self {
            Self::SetEngine(engine) => format!("engine:{}", engine.as_str()),
            Self::ShowModels => "models".to_string(),
            Self::SetModel(key) => format!("model:{}", key),
        }
    }
}

impl fmt::Display for SettingsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.callback_data())
    }
}

/// A button in a settings menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub action: SettingsAction,
}

impl MenuButton {
    pub fn new(label: impl Into<String>, action: SettingsAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Rows of buttons, rendered by the transport as an inline keyboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsMenu {
    pub rows: Vec<Vec<MenuButton>>,
}

impl SettingsMenu {
    pub fn new(rows: Vec<Vec<MenuButton>>) -> Self {
        Self { rows }
    }

    /// All buttons in row order.
    pub fn buttons(&self) -> impl Iterator<Item = &MenuButton> {
        self.rows.iter().flatten()
    }
}
