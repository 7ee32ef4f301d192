//! Single-action guard for interactive controls.
//!
//! Scopes one control (typically a submit button) to at most one in-flight
//! action. The core never registers event listeners or touches widgets;
//! the UI layer implements [`InteractiveControl`] for whatever it wires up
//! and calls [`guard_control`] from its event handlers.

/// One-method seam the UI layer implements for a disableable control.
pub trait InteractiveControl {
    fn set_enabled(&self, enabled: bool);
}

/// Disable `control` before running `op`, re-enabling it exactly once when
/// `op` settles, on success, failure or cancellation. With no control this
/// is a plain passthrough.
///
/// Not reentrant: a second call for the same control while the first is
/// outstanding is a caller error. A disabled control cannot normally be
/// triggered again, so the case is unreachable through the UI; it is a
/// documented assumption, not enforced here.
pub async fn guard_control<T, F, Fut>(control: Option<&dyn InteractiveControl>, op: F) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let Some(control) = control else {
        return op().await;
    };

    control.set_enabled(false);
    let _guard = EnableOnDrop { control };
    op().await
}

struct EnableOnDrop<'a> {
    control: &'a dyn InteractiveControl,
}

impl Drop for EnableOnDrop<'_> {
    fn drop(&mut self) {
        self.control.set_enabled(true);
    }
}
