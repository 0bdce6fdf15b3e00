//! Deduplicated warnings for unsupported features.
//!
//! Style parsing and tree construction hit the same unsupported value over
//! and over (once per element). Each distinct `(component, message)` pair is
//! reported once as a `tracing` warning until [`clear_warnings`] is called.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature (emitted once per unique message).
///
/// Returns `true` if the warning was emitted, `false` if it was suppressed
/// as a duplicate.
///
/// # Example
/// ```
/// use trellis_common::warning::warn_once;
///
/// let _ = warn_once("CSS", "unsupported unit 'em' in margin-left: 1.5em");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time {
        tracing::warn!(component, "{message}");
    }
    first_time
}

/// Clear all recorded warnings (call when a layout tree is rebuilt).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
