//! Gesture timing configuration.

use crate::error::GestureError;
use crate::{DEFAULT_CLICK_DELAY_MS, DEFAULT_LONG_PRESS_MS};
use serde::{Deserialize, Serialize};

/// Timing windows used by the disambiguator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// How long a single click waits for a second click (ms).
    pub click_delay_ms: u64,
    /// How long a touch must be held to count as a long press (ms).
    pub long_press_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            click_delay_ms: DEFAULT_CLICK_DELAY_MS,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
        }
    }
}

impl GestureConfig {
    /// Validate timing windows.
    pub fn validate(&self) -> Result<(), GestureError> {
        if self.click_delay_ms == 0 {
            return Err(GestureError::ZeroClickDelay);
        }
        if self.long_press_ms == 0 {
            return Err(GestureError::ZeroLongPress);
        }
        Ok(())
    }

    /// Builder: set click delay
    pub fn with_click_delay(mut self, ms: u64) -> Self {
        self.click_delay_ms = ms;
        self
    }

    /// Builder: set long-press threshold
    pub fn with_long_press(mut self, ms: u64) -> Self {
        self.long_press_ms = ms;
        self
    }
}
