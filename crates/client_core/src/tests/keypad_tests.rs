use super::*;

fn field(text: &str, min: Option<i64>, max: Option<i64>) -> BoundedIntegerField {
    BoundedIntegerField::new(text, Bounds::new(min, max))
}

#[test]
fn digit_entry_saturates_at_max_instead_of_concatenating() {
    let mut f = field("0", Some(0), Some(9));
    assert!(f.append_digit(5));
    assert!(f.append_digit(9));
    assert_eq!(f.value(), 9);
    assert_eq!(f.raw_text(), "9");
}

#[test]
fn digit_entry_without_bounds_shifts_places() {
    let mut f = field("0", None, None);
    for digit in [1, 2, 3] {
        f.append_digit(digit);
    }
    assert_eq!(f.raw_text(), "123");
}

#[test]
fn digit_entry_extends_negative_magnitude() {
    let mut f = field("-5", None, None);
    f.append_digit(3);
    assert_eq!(f.value(), -53);
}

#[test]
fn digit_entry_raises_to_min() {
    let mut f = field("0", Some(10), Some(99));
    f.append_digit(4);
    assert_eq!(f.value(), 10);
}

#[test]
fn digit_entry_is_suppressed_when_bounds_are_inverted() {
    let mut f = field("7", Some(10), Some(5));
    assert!(!f.append_digit(1));
    assert_eq!(f.raw_text(), "7");
}

#[test]
fn digit_entry_ignores_letters_in_display() {
    let mut f = field("1a2", None, None);
    f.append_digit(4);
    assert_eq!(f.value(), 124);
}

#[test]
fn digit_entry_rejects_non_decimal_digit() {
    let mut f = field("3", None, None);
    assert!(!f.append_digit(10));
    assert_eq!(f.raw_text(), "3");
}

#[test]
fn digit_entry_saturates_instead_of_overflowing() {
    let mut f = field(&i64::MAX.to_string(), None, None);
    f.append_digit(9);
    assert_eq!(f.value(), i64::MAX);
}

#[test]
fn increment_at_max_is_noop() {
    let mut f = field("5", Some(0), Some(5));
    assert!(!f.increment());
    assert_eq!(f.raw_text(), "5");
}

#[test]
fn decrement_at_min_is_noop() {
    let mut f = field("0", Some(0), Some(5));
    assert!(!f.decrement());
    assert_eq!(f.raw_text(), "0");
}

#[test]
fn increment_above_max_stays_put() {
    let mut f = field("8", None, Some(5));
    assert!(!f.increment());
    assert_eq!(f.value(), 8);
}

#[test]
fn increment_below_min_enters_window() {
    let mut f = field("0", Some(10), Some(20));
    assert!(f.increment());
    assert_eq!(f.value(), 10);
}

#[test]
fn decrement_above_max_enters_window() {
    let mut f = field("100", Some(0), Some(20));
    assert!(f.decrement());
    assert_eq!(f.value(), 20);
}

#[test]
fn repeated_increments_never_pass_max() {
    let mut f = field("0", Some(-5), Some(5));
    for _ in 0..20 {
        f.increment();
        assert!(f.value() <= 5);
    }
    assert_eq!(f.value(), 5);
}

#[test]
fn increment_and_decrement_treat_garbage_as_zero() {
    let mut f = field("abc", None, None);
    f.increment();
    assert_eq!(f.raw_text(), "1");

    let mut f = field("", None, None);
    f.decrement();
    assert_eq!(f.raw_text(), "-1");
}

#[test]
fn reset_ignores_bounds() {
    let mut f = field("42", Some(10), Some(50));
    f.reset();
    assert_eq!(f.value(), 0);
    assert_eq!(f.raw_text(), "0");
}

#[test]
fn negate_does_not_clamp() {
    let mut f = field("7", Some(0), Some(9));
    f.negate();
    assert_eq!(f.value(), -7);
}

#[test]
fn free_text_moves_stray_sign_to_front() {
    let mut f = field("0", None, None);
    f.sanitize_free_text("12-3-");
    assert_eq!(f.value(), -123);
    assert_eq!(f.raw_text(), "-123");
}

#[test]
fn free_text_without_digits_is_zero() {
    let mut f = field("17", None, None);
    f.sanitize_free_text("abc");
    assert_eq!(f.raw_text(), "0");

    f.sanitize_free_text("-");
    assert_eq!(f.raw_text(), "0");
}

#[test]
fn free_text_is_clamped_each_side() {
    let mut f = field("0", Some(-10), Some(100));
    f.sanitize_free_text("1x000");
    assert_eq!(f.value(), 100);
    f.sanitize_free_text("-55");
    assert_eq!(f.value(), -10);

    let mut lower_only = field("0", Some(3), None);
    lower_only.sanitize_free_text("99999");
    assert_eq!(lower_only.value(), 99999);
}

#[test]
fn leading_int_parse_follows_keypad_display_rules() {
    assert_eq!(parse_leading_int("  42px"), Some(42));
    assert_eq!(parse_leading_int("-0"), Some(0));
    assert_eq!(parse_leading_int("+8"), Some(8));
    assert_eq!(parse_leading_int("-"), None);
    assert_eq!(parse_leading_int("x1"), None);
    assert_eq!(parse_leading_int("-99999999999999999999"), Some(i64::MIN));
}

#[test]
fn sanitize_keeps_single_leading_sign() {
    assert_eq!(sanitize_digits_and_sign("-12"), "-12");
    assert_eq!(sanitize_digits_and_sign("--5"), "-5");
    assert_eq!(sanitize_digits_and_sign("a1 b2"), "12");
    assert_eq!(strip_to_digits_and_sign("1-2"), "1-2");
}

#[test]
fn bounds_clamp_and_contains() {
    let bounds = Bounds::between(-5, 5);
    assert_eq!(bounds.clamp(9), 5);
    assert_eq!(bounds.clamp(-9), -5);
    assert!(bounds.contains(0));
    assert!(!bounds.contains(6));
    assert!(Bounds::UNBOUNDED.contains(i64::MIN));
}
