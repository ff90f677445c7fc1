use super::*;

#[derive(Default)]
struct RecordingSurface {
    text: String,
    writes: Vec<String>,
}

impl DisplaySurface for RecordingSurface {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.writes.push(text.to_string());
    }
}

fn counts_keypad() -> Keypad<String> {
    Keypad::in_memory(&[
        FieldSpec::new("correct_keyboard", Bounds::between(0, 999_999)),
        FieldSpec::new("defect_keyboard", Bounds::between(0, 999_999)),
    ])
}

#[test]
fn handle_writes_surface_after_each_mutation() {
    let spec = FieldSpec::new("qty", Bounds::between(0, 9));
    let mut handle = FieldHandle::bind(&spec, RecordingSurface::default());

    handle.apply(&FieldAction::Digit(5));
    handle.apply(&FieldAction::Digit(9));

    assert_eq!(handle.surface().writes, vec!["5", "9"]);
    assert_eq!(handle.value(), 9);
}

#[test]
fn noop_actions_leave_surface_untouched() {
    let spec = FieldSpec::new("qty", Bounds::between(0, 3));
    let mut handle = FieldHandle::bind(
        &spec,
        RecordingSurface {
            text: "3".to_string(),
            writes: Vec::new(),
        },
    );

    let outcome = handle.apply(&FieldAction::Increment);

    assert_eq!(
        outcome,
        FieldOutcome {
            value: 3,
            written: false
        }
    );
    assert!(handle.surface().writes.is_empty());
}

#[test]
fn handle_rereads_surface_edits_between_actions() {
    let spec = FieldSpec::new("qty", Bounds::UNBOUNDED);
    let mut handle = FieldHandle::bind(&spec, "4".to_string());

    handle.surface_mut().push('2');
    handle.apply(&FieldAction::Increment);

    assert_eq!(handle.surface(), "43");
}

#[test]
fn dispatch_routes_to_the_named_field_only() {
    let mut keypad = counts_keypad();

    keypad
        .dispatch(&FieldId::correct(), &FieldAction::Digit(7))
        .expect("correct field");
    keypad
        .dispatch_str(&FieldId::defect(), "increment")
        .expect("defect field");

    assert_eq!(keypad.value(&FieldId::correct()).expect("value"), 7);
    assert_eq!(keypad.value(&FieldId::defect()).expect("value"), 1);
}

#[test]
fn dispatch_to_unbound_field_is_an_error() {
    let mut keypad = counts_keypad();
    let err = keypad
        .dispatch(&FieldId::new("missing"), &FieldAction::Reset)
        .expect_err("unbound");
    assert!(matches!(err, KeypadError::UnknownField(id) if id.as_str() == "missing"));
}

#[test]
fn dispatch_str_rejects_unknown_action_text() {
    let mut keypad = counts_keypad();
    let err = keypad
        .dispatch_str(&FieldId::correct(), "digit:x")
        .expect_err("bad digit");
    assert!(matches!(err, KeypadError::Action(_)));
}

#[test]
fn clear_zeroes_only_the_correct_field() {
    let mut keypad = counts_keypad();
    keypad.apply_counts(12, 3);

    let outcome = keypad.clear_correct().expect("correct field bound");

    assert_eq!(outcome.value, 0);
    assert_eq!(keypad.value(&FieldId::correct()).expect("correct"), 0);
    assert_eq!(keypad.value(&FieldId::defect()).expect("defect"), 3);
}

#[test]
fn clear_without_correct_field_does_nothing() {
    let mut keypad = Keypad::in_memory(&[FieldSpec::new("qty", Bounds::UNBOUNDED)]);
    assert_eq!(keypad.clear_correct(), None);
}

#[test]
fn server_counts_bypass_bounds() {
    let mut keypad = counts_keypad();
    keypad.apply_counts(-4, 1_000_000);

    assert_eq!(keypad.value(&FieldId::correct()).expect("value"), -4);
    assert_eq!(
        keypad
            .field(&FieldId::defect())
            .expect("defect")
            .surface()
            .as_str(),
        "1000000"
    );
}

#[test]
fn rebinding_replaces_the_surface_and_bounds() {
    let mut keypad = counts_keypad();
    let handle = keypad.bind(
        &FieldSpec::new("correct_keyboard", Bounds::between(0, 5)),
        "2".to_string(),
    );
    handle.apply(&FieldAction::Digit(8));

    assert_eq!(keypad.value(&FieldId::correct()).expect("value"), 5);
    assert_eq!(keypad.ids().count(), 2);
}

#[test]
fn field_spec_reads_optional_bounds_from_toml() {
    let spec: FieldSpec = toml::from_str("id = \"qty\"\nmax = 10\n").expect("toml");
    assert_eq!(spec.bounds(), Bounds::new(None, Some(10)));
}
