//! Binds keypad fields to display surfaces once, then routes actions to them.

use std::collections::{btree_map::Entry, BTreeMap};

use serde::{Deserialize, Serialize};
use shared::{domain::FieldId, protocol::FieldAction};
use tracing::debug;

use crate::{
    error::KeypadError,
    keypad::{BoundedIntegerField, Bounds},
};

/// Somewhere a field's text is shown and edited.
pub trait DisplaySurface {
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
}

impl DisplaySurface for String {
    fn text(&self) -> String {
        self.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub id: FieldId,
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

impl FieldSpec {
    pub fn new(id: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            id: FieldId::new(id),
            min: bounds.min,
            max: bounds.max,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOutcome {
    pub value: i64,
    /// False when the action left the surface untouched.
    pub written: bool,
}

#[derive(Debug)]
pub struct FieldHandle<S> {
    id: FieldId,
    bounds: Bounds,
    surface: S,
}

impl<S: DisplaySurface> FieldHandle<S> {
    pub fn bind(spec: &FieldSpec, surface: S) -> Self {
        Self {
            id: spec.id.clone(),
            bounds: spec.bounds(),
            surface,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn value(&self) -> i64 {
        self.field().value()
    }

    pub fn apply(&mut self, action: &FieldAction) -> FieldOutcome {
        let mut field = self.field();
        let written = match action {
            FieldAction::Increment => field.increment(),
            FieldAction::Decrement => field.decrement(),
            FieldAction::Digit(digit) => field.append_digit(*digit),
            FieldAction::Negate => field.negate(),
            FieldAction::Reset => field.reset(),
            FieldAction::FreeTextChanged(text) => field.sanitize_free_text(text),
        };
        if written {
            self.surface.set_text(field.raw_text());
        }
        let value = field.value();
        debug!(field = %self.id, %action, value, written, "applied field action");
        FieldOutcome { value, written }
    }

    /// Shows a value that came from elsewhere, such as the counting server.
    pub fn write_value(&mut self, value: i64) {
        let mut field = self.field();
        field.write(value);
        self.surface.set_text(field.raw_text());
    }

    fn field(&self) -> BoundedIntegerField {
        BoundedIntegerField::new(self.surface.text(), self.bounds)
    }
}

/// The set of fields one screen works with.
#[derive(Debug)]
pub struct Keypad<S> {
    fields: BTreeMap<FieldId, FieldHandle<S>>,
}

impl<S> Default for Keypad<S> {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }
}

impl Keypad<String> {
    /// Fields backed by plain strings, each starting at `0`.
    pub fn in_memory(specs: &[FieldSpec]) -> Self {
        let mut keypad = Self::default();
        for spec in specs {
            keypad.bind(spec, "0".to_string());
        }
        keypad
    }
}

impl<S: DisplaySurface> Keypad<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `surface` under `spec.id`, replacing any earlier binding.
    pub fn bind(&mut self, spec: &FieldSpec, surface: S) -> &mut FieldHandle<S> {
        let handle = FieldHandle::bind(spec, surface);
        match self.fields.entry(spec.id.clone()) {
            Entry::Occupied(mut entry) => {
                entry.insert(handle);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(handle),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &FieldId> {
        self.fields.keys()
    }

    pub fn field(&self, id: &FieldId) -> Option<&FieldHandle<S>> {
        self.fields.get(id)
    }

    pub fn field_mut(&mut self, id: &FieldId) -> Option<&mut FieldHandle<S>> {
        self.fields.get_mut(id)
    }

    pub fn dispatch(
        &mut self,
        id: &FieldId,
        action: &FieldAction,
    ) -> Result<FieldOutcome, KeypadError> {
        let handle = self
            .fields
            .get_mut(id)
            .ok_or_else(|| KeypadError::UnknownField(id.clone()))?;
        Ok(handle.apply(action))
    }

    /// Parses a textual action such as `digit:4` and dispatches it.
    pub fn dispatch_str(
        &mut self,
        id: &FieldId,
        action: &str,
    ) -> Result<FieldOutcome, KeypadError> {
        let action: FieldAction = action.parse()?;
        self.dispatch(id, &action)
    }

    pub fn value(&self, id: &FieldId) -> Result<i64, KeypadError> {
        self.fields
            .get(id)
            .map(FieldHandle::value)
            .ok_or_else(|| KeypadError::UnknownField(id.clone()))
    }

    /// The "clear" key: zeroes the correct-count field and leaves the rest.
    pub fn clear_correct(&mut self) -> Option<FieldOutcome> {
        self.fields
            .get_mut(&FieldId::correct())
            .map(|handle| handle.apply(&FieldAction::Reset))
    }

    /// Writes server-side correct/defect counts into whichever of the two
    /// fields are bound.
    pub fn apply_counts(&mut self, correct_count: i64, defect_count: i64) {
        if let Some(handle) = self.fields.get_mut(&FieldId::correct()) {
            handle.write_value(correct_count);
        }
        if let Some(handle) = self.fields.get_mut(&FieldId::defect()) {
            handle.write_value(defect_count);
        }
    }
}

#[cfg(test)]
#[path = "tests/binding_tests.rs"]
mod tests;
