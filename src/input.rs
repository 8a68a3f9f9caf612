//! Numeric answer entry shared by the on-screen pad and the physical keyboard.

use crate::round::Event;

/// Digits typed so far. No validation; scoring parses whatever is here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputBuffer {
    digits: String,
}

impl InputBuffer {
    pub fn push_digit(&mut self, digit: u8) {
        if let Some(c) = char::from_digit(u32::from(digit), 10) {
            self.digits.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.digits.pop();
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// The player's guess; empty or unparseable input counts as zero.
    pub fn guess(&self) -> u32 {
        parse_guess(&self.digits)
    }
}

pub fn parse_guess(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

/// Map a `KeyboardEvent.key` value to a machine event. Other keys are ignored.
pub fn key_event(key: &str) -> Option<Event> {
    match key {
        "Enter" => Some(Event::Confirm),
        "Backspace" => Some(Event::Backspace),
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c.to_digit(10).map(|d| Event::Digit(d as u8)),
                _ => None,
            }
        }
    }
}

/// Keypad layout, in button order.
pub const PAD_DIGITS: [u8; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 0];
