//! Port adapters.

mod reqwest_client;
mod system_clock;
mod tracing_notifier;

pub use reqwest_client::ReqwestRequestService;
pub use system_clock::SystemClock;
pub use tracing_notifier::TracingNotifier;
