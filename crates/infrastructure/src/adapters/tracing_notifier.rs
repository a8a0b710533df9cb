//! Notifier adapter that renders notices as log events.

use pulse_application::ports::Notifier;
use pulse_domain::{Notice, NoticeLevel};
use tracing::{error, info, warn};

/// Emits every notice as a `tracing` event at a matching level.
///
/// Used by the command-line front end, where the log is the only surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info | NoticeLevel::Success => {
                info!(target: "pulse::notice", level = ?notice.level, "{}", notice.message);
            }
            NoticeLevel::Warning => warn!(target: "pulse::notice", "{}", notice.message),
            NoticeLevel::Error => error!(target: "pulse::notice", "{}", notice.message),
        }
    }
}
