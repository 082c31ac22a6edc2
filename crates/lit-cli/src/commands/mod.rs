pub mod discover;
pub mod exec;

use colored::control::{self, SHOULD_COLORIZE};

/// Turns colored output off until dropped, then puts back the setting that
/// was in effect before. Dropping also happens on early `?` returns.
#[must_use]
pub struct ColorOverride {
    previous: Option<bool>,
}

impl ColorOverride {
    pub fn disable_if(no_color: bool) -> Self {
        if !no_color {
            return Self { previous: None };
        }
        let previous = SHOULD_COLORIZE.should_colorize();
        control::set_override(false);
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for ColorOverride {
    fn drop(&mut self) {
        if let Some(previous) = self.previous {
            control::set_override(previous);
        }
    }
}
