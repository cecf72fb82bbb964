//! Setup job handling: the initial trigger and the completion poller.

pub mod models;
pub mod poller;
pub mod trigger;

pub use models::SetupRequest;
pub use poller::{PollPolicy, SetupPoller};
pub use trigger::trigger_setup;
