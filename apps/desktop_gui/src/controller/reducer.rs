//! Station state and the transitions applied to it by UI input and backend
//! events.

use std::collections::BTreeMap;

use client_core::{
    FieldSpec, KeyValueStore, Keypad, PageContext, QueueNotifier, Settings, ToastKind,
};
use shared::{
    domain::FieldId,
    protocol::{CountSnapshot, FieldAction, RunStatus},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub struct StationState<K> {
    pub keypad: Keypad<String>,
    pub page: PageContext<K, QueueNotifier>,
    /// Field the on-screen keypad types into.
    pub selected: FieldId,
    pub item_no: String,
    pub total_count: i64,
    pub current_count: i64,
    pub status: String,
    specs: Vec<FieldSpec>,
}

impl<K: KeyValueStore> StationState<K> {
    pub fn new(settings: &Settings, store: K) -> Self {
        let selected = settings
            .fields
            .first()
            .map(|spec| spec.id.clone())
            .unwrap_or_else(FieldId::correct);
        Self {
            keypad: Keypad::in_memory(&settings.fields),
            page: PageContext::init(store, QueueNotifier::new()),
            selected,
            item_no: String::new(),
            total_count: 0,
            current_count: 0,
            status: String::new(),
            specs: settings.fields.clone(),
        }
    }

    pub fn field_ids(&self) -> Vec<FieldId> {
        self.keypad.ids().cloned().collect()
    }

    pub fn apply_field_action(&mut self, id: &FieldId, action: &FieldAction) {
        if let Err(err) = self.keypad.dispatch(id, action) {
            self.status = err.to_string();
        }
    }

    /// A tap on the on-screen keypad, aimed at the selected field.
    pub fn press_key(&mut self, action: &FieldAction) {
        let selected = self.selected.clone();
        self.apply_field_action(&selected, action);
    }

    pub fn clear_correct(&mut self) {
        self.keypad.clear_correct();
    }

    fn field_value(&self, id: &FieldId) -> i64 {
        self.keypad.value(id).unwrap_or_default()
    }

    pub fn save_command(&self) -> BackendCommand {
        let mut custom_fields = BTreeMap::new();
        if !self.item_no.trim().is_empty() {
            custom_fields.insert("item_no".to_string(), self.item_no.trim().to_string());
        }
        BackendCommand::SaveCount {
            correct_count: self.field_value(&FieldId::correct()),
            defect_count: self.field_value(&FieldId::defect()),
            custom_fields,
        }
    }

    pub fn reset_current_command(&self) -> BackendCommand {
        BackendCommand::ResetCountCurrent {
            correct_count: self.field_value(&FieldId::correct()),
            defect_count: self.field_value(&FieldId::defect()),
            item_no: self.item_no.trim().to_string(),
        }
    }

    /// Rebinds the fields at zero. Totals stay at whatever the server last
    /// reported.
    pub fn reload(&mut self) {
        self.keypad = Keypad::in_memory(&self.specs);
        self.status = "Station reloaded".to_string();
    }

    fn apply_counts(&mut self, snapshot: CountSnapshot) {
        self.total_count = snapshot.total_count;
        self.keypad
            .apply_counts(snapshot.correct_count, snapshot.defect_count);
    }
}

pub fn apply_ui_event<K: KeyValueStore>(state: &mut StationState<K>, event: UiEvent) {
    match event {
        UiEvent::Info(message) => {
            state.status = message;
        }
        UiEvent::CountsSaved(snapshot) => {
            state.apply_counts(snapshot);
            state.page.toast("Count saved", ToastKind::Success);
        }
        UiEvent::CountsReset(snapshot) => {
            state.apply_counts(snapshot);
            state.page.toast("Counters reset", ToastKind::Info);
        }
        UiEvent::CurrentCountReset(snapshot) => {
            state.current_count = snapshot.current_count;
            state
                .keypad
                .apply_counts(snapshot.correct_count, snapshot.defect_count);
            state.page.toast("Current batch reset", ToastKind::Info);
        }
        UiEvent::RunStatusChanged(status) => {
            state.page.apply_run_status(status);
            let (message, kind) = match status {
                RunStatus::Started => ("Counting started", ToastKind::Success),
                RunStatus::Paused => ("Counting paused", ToastKind::Warning),
                RunStatus::Stopped => ("Counting stopped", ToastKind::Info),
            };
            state.page.toast(message, kind);
        }
        UiEvent::Connection(connection) => {
            state.page.on_connection(connection);
        }
        UiEvent::Error(err) => {
            tracing::warn!(
                context = ?err.context(),
                category = ?err.category(),
                "{}",
                err.message()
            );
            state.status = err.message().to_string();
            state.page.toast(err.message(), ToastKind::Danger);
        }
    }
}
