//! User-facing texts and settings menus.

use crate::actions::{MenuButton, SettingsAction, SettingsMenu};
use crate::catalog::ModelCatalog;
use crate::chain::SECONDARY_LABEL;
use crate::orchestrator::ProgressEvent;
use crate::preferences::{Engine, UserPreference};

/// Greeting shown for `/start` and `/help`.
pub const START_TEXT: &str = "🎨 Hi! Send me a description of what to draw, in any language.\n\n\
Example: `cyberpunk city landscape, high detail`\n\n\
Use /settings to choose the engine and model.";

/// First status text of every request.
pub const INITIAL_ACK_TEXT: &str = "⌛ Starting generation... This can take up to a minute.";

/// Final status text when no provider produced an image.
pub const FAILURE_TEXT: &str =
    "❌ Could not generate the image. Try again later or change the prompt.";

pub fn attempt_text(label: &str, attempt: u32, budget: u32) -> String {
    format!("🎨 Drawing with {} (attempt {}/{})...", label, attempt, budget)
}

pub fn warmup_text(label: &str, attempt: u32, budget: u32) -> String {
    format!(
        "⏳ {} is warming up on the server... retrying ({}/{})",
        label, attempt, budget
    )
}

pub fn failover_text(from: &str, to: &str) -> String {
    format!("🔁 {} failed, switching to {}...", from, to)
}

/// Status text for a progress event.
pub fn progress_text(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Attempting {
            label,
            attempt,
            budget,
            ..
        } => attempt_text(label, *attempt, *budget),
        ProgressEvent::WarmingUp {
            label,
            attempt,
            budget,
        } => warmup_text(label, *attempt, *budget),
        ProgressEvent::Advancing { from, to } => failover_text(from, to),
    }
}

/// Caption for a delivered image.
///
/// Length limits belong to the transport.
pub fn success_caption(label: &str, prompt: &str) -> String {
    format!("✨ Done with {}: {}", label, prompt)
}

fn engine_label(engine: Engine) -> &'static str {
    match engine {
        Engine::Primary => "HuggingFace",
        Engine::Secondary => SECONDARY_LABEL,
    }
}

/// Label of the model that will serve a preference.
pub fn model_label<'a>(preference: &'a UserPreference, catalog: &'a ModelCatalog) -> &'a str {
    match preference.engine {
        Engine::Secondary => SECONDARY_LABEL,
        Engine::Primary => catalog
            .get(&preference.model_key)
            .map(|model| model.label.as_str())
            .unwrap_or(preference.model_key.as_str()),
    }
}

/// Text describing a user's current settings.
pub fn settings_text(preference: &UserPreference, catalog: &ModelCatalog) -> String {
    format!(
        "⚙️ Settings\n\nEngine: {}\nModel: {}\n\nChoose an engine or pick a model:",
        engine_label(preference.engine),
        model_label(preference, catalog)
    )
}

fn checked(label: &str, selected: bool) -> String {
    if selected {
        format!("✅ {}", label)
    } else {
        label.to_string()
    }
}

/// Top-level settings menu: engine choice plus a link to the model list.
pub fn settings_menu(preference: &UserPreference) -> SettingsMenu {
    SettingsMenu::new(vec![
        vec![
            MenuButton::new(
                checked(engine_label(Engine::Primary), preference.engine == Engine::Primary),
                SettingsAction::SetEngine(Engine::Primary),
            ),
            MenuButton::new(
                checked(
                    engine_label(Engine::Secondary),
                    preference.engine == Engine::Secondary,
                ),
                SettingsAction::SetEngine(Engine::Secondary),
            ),
        ],
        vec![MenuButton::new("🖼 Choose model", SettingsAction::ShowModels)],
    ])
}

pub const MODELS_TEXT: &str = "🖼 Choose a model:";

/// One button per catalog model, in catalog order.
pub fn models_menu(preference: &UserPreference, catalog: &ModelCatalog) -> SettingsMenu {
    let rows = catalog
        .iter()
        .map(|(key, model)| {
            let selected = preference.engine == Engine::Primary && preference.model_key == key;
            vec![MenuButton::new(
                checked(&model.label, selected),
                SettingsAction::SetModel(key.to_string()),
            )]
        })
        .collect();
    SettingsMenu::new(rows)
}

pub fn engine_confirmation(engine: Engine) -> String {
    format!("Engine set to {}", engine_label(engine))
}

pub fn model_confirmation(label: &str) -> String {
    format!("Model set to {}", label)
}
