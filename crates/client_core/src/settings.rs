use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared::domain::{FieldId, LocationId, CORRECT_FIELD, DEFECT_FIELD};

use crate::{binding::FieldSpec, keypad::Bounds};

pub const DEFAULT_CONFIG_PATH: &str = "tally.toml";
/// Largest magnitude the keypad display accepts.
pub const KEYPAD_LIMIT: i64 = 999_999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub location: String,
    pub state_path: PathBuf,
    pub fields: Vec<FieldSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            location: "default".into(),
            state_path: PathBuf::from("./data/tally_state.json"),
            fields: default_fields(),
        }
    }
}

impl Settings {
    pub fn location_id(&self) -> LocationId {
        LocationId::new(self.location.clone())
    }

    pub fn field_spec(&self, id: &FieldId) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| &spec.id == id)
    }
}

pub fn default_fields() -> Vec<FieldSpec> {
    let bounds = Bounds::between(-KEYPAD_LIMIT, KEYPAD_LIMIT);
    vec![
        FieldSpec::new(CORRECT_FIELD, bounds),
        FieldSpec::new(DEFECT_FIELD, bounds),
    ]
}

/// Defaults, then the TOML file, then environment overrides.
///
/// An explicitly requested file must exist; the default `tally.toml` is
/// optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };

    let mut settings = match fs::read_to_string(&path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
            Settings::default()
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("TALLY_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("TALLY_LOCATION") {
        settings.location = v;
    }
    if let Some(v) = lookup("APP__LOCATION") {
        settings.location = v;
    }

    if let Some(v) = lookup("TALLY_STATE_PATH") {
        settings.state_path = PathBuf::from(v);
    }
    if let Some(v) = lookup("APP__STATE_PATH") {
        settings.state_path = PathBuf::from(v);
    }
}
