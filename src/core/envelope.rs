//! Items carried by the delivery queue

use super::log_message::LogMessage;
use serde::{Deserialize, Serialize};

/// One element of the delivery queue.
///
/// `Shutdown` is sent exactly once, after the producer's last message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Envelope {
    Message(LogMessage),
    Shutdown,
}

impl From<LogMessage> for Envelope {
    fn from(message: LogMessage) -> Self {
        Envelope::Message(message)
    }
}
