//! Pointer gesture disambiguation for the mind-map explorer.
//!
//! Node-targeted pointer events from mouse or touch are classified into
//! exactly one semantic action per gesture:
//!
//! 1. **Mouse** - single click activates, double click toggles expansion
//! 2. **Touch** - short tap activates, long press toggles expansion
//! 3. **Deterministic** - timers are deadlines checked against a [`Clock`],
//!    so any event sequence can be replayed under a [`ManualClock`]
//!
//! # Architecture
//!
//! ```text
//! Mouse ─┐
//!        ├──► PointerEvent ──► Disambiguator ──► GestureAction
//! Touch ─┘                          │
//!                                   ▼
//!                             one pending timer
//! ```
//!
//! # Example
//!
//! ```ignore
//! use mindmap_input::{Disambiguator, PointerEvent};
//!
//! let mut gestures = Disambiguator::new();
//! let dispatch = gestures.handle(PointerEvent::mouse_down("root"), clock.now_ms());
//! for action in dispatch.actions {
//!     state.apply(action);
//! }
//! // Each frame:
//! if let Some(action) = gestures.poll(clock.now_ms()) {
//!     state.apply(action);
//! }
//! ```

mod clock;
mod config;
mod error;
mod gesture;
mod pointer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::GestureConfig;
pub use error::GestureError;
pub use gesture::{ActionKind, Disambiguator, Dispatch, GestureAction, GestureState, Propagation};
pub use pointer::{Modality, PointerEvent};

/// Default single-click window before a click counts as a lone click (milliseconds).
pub const DEFAULT_CLICK_DELAY_MS: u64 = 250;

/// Default hold duration for a touch to count as a long press (milliseconds).
pub const DEFAULT_LONG_PRESS_MS: u64 = 500;
