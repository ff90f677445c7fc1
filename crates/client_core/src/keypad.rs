//! Bounded integer entry driven by keypad taps and free typing.
//!
//! A field is its displayed text plus optional bounds. Every operation reads
//! the text leniently (garbage counts as 0), computes the next value and
//! reports whether it wrote the text back. Nothing here fails.

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

impl Bounds {
    pub const UNBOUNDED: Bounds = Bounds {
        min: None,
        max: None,
    };

    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub fn between(min: i64, max: i64) -> Self {
        Self::new(Some(min), Some(max))
    }

    /// Saturates at `max` first, then at `min`.
    pub fn clamp(&self, value: i64) -> i64 {
        let mut value = value;
        if let Some(max) = self.max {
            if value > max {
                value = max;
            }
        }
        if let Some(min) = self.min {
            if value < min {
                value = min;
            }
        }
        value
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedIntegerField {
    raw_text: String,
    bounds: Bounds,
}

impl BoundedIntegerField {
    pub fn new(raw_text: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            raw_text: raw_text.into(),
            bounds,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The integer the text reads as, or `None` when it has no leading digits.
    pub fn parsed(&self) -> Option<i64> {
        parse_leading_int(&self.raw_text)
    }

    pub fn value(&self) -> i64 {
        self.parsed().unwrap_or(0)
    }

    pub fn increment(&mut self) -> bool {
        let value = self.value();
        if let Some(max) = self.bounds.max {
            if value >= max {
                debug!(value, max, "increment at upper bound ignored");
                return false;
            }
        }
        self.write(self.bounds.clamp(value.saturating_add(1)));
        true
    }

    pub fn decrement(&mut self) -> bool {
        let value = self.value();
        if let Some(min) = self.bounds.min {
            if value <= min {
                debug!(value, min, "decrement at lower bound ignored");
                return false;
            }
        }
        self.write(self.bounds.clamp(value.saturating_sub(1)));
        true
    }

    pub fn append_digit(&mut self, digit: u8) -> bool {
        if digit > 9 {
            debug!(digit, "non-decimal digit ignored");
            return false;
        }
        let current = parse_leading_int(&strip_to_digits_and_sign(&self.raw_text)).unwrap_or(0);
        let next = self.bounds.clamp(shift_append(current, digit));
        if !self.bounds.contains(next) {
            debug!(
                current,
                digit,
                next,
                "digit entry suppressed: clamped value still outside bounds"
            );
            return false;
        }
        self.write(next);
        true
    }

    /// Flips the sign without consulting the bounds.
    pub fn negate(&mut self) -> bool {
        let value = self.value();
        self.write(value.saturating_neg());
        true
    }

    pub fn reset(&mut self) -> bool {
        self.write(0);
        true
    }

    pub fn sanitize_free_text(&mut self, input: &str) -> bool {
        let cleaned = sanitize_digits_and_sign(input);
        let value = parse_leading_int(&cleaned).unwrap_or(0);
        self.write(self.bounds.clamp(value));
        true
    }

    /// Overwrites the text with `value`, ignoring bounds.
    pub fn write(&mut self, value: i64) {
        self.raw_text = value.to_string();
    }
}

/// Appends `digit` as the new least significant decimal place, keeping the
/// sign of `current`.
pub fn shift_append(current: i64, digit: u8) -> i64 {
    let shifted = current.saturating_mul(10);
    if current < 0 {
        shifted.saturating_sub(i64::from(digit))
    } else {
        shifted.saturating_add(i64::from(digit))
    }
}

/// Drops every character that is neither an ASCII digit nor `-`.
pub fn strip_to_digits_and_sign(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Like [`strip_to_digits_and_sign`], then folds any stray `-` into a single
/// leading sign: `"12-3-"` becomes `"-123"`.
pub fn sanitize_digits_and_sign(input: &str) -> String {
    let mut cleaned = strip_to_digits_and_sign(input);
    if cleaned.char_indices().any(|(idx, c)| c == '-' && idx > 0) {
        cleaned.retain(|c| c != '-');
        cleaned.insert(0, '-');
    }
    cleaned
}

/// Reads an optionally signed run of leading decimal digits, skipping leading
/// whitespace and ignoring whatever follows. Saturates instead of
/// overflowing.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut seen_digit = false;
    let mut value: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        let digit = i64::from(byte - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    seen_digit.then_some(value)
}

#[cfg(test)]
#[path = "tests/keypad_tests.rs"]
mod tests;
