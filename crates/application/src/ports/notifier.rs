//! Notifier port for user-facing notices

use pulse_domain::Notice;

/// Port for surfacing non-modal notices to the user.
pub trait Notifier: Send + Sync {
    /// Shows a notice. Must not block.
    fn notify(&self, notice: Notice);
}
