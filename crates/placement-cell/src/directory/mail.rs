use serde::{Deserialize, Serialize};

/// Outbound message handed to the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Trait describing the outbound mail hook (SMTP adapters, console loggers).
pub trait MailGateway: Send + Sync {
    fn send(&self, mail: OutboundMail) -> Result<(), MailError>;
}

/// Mail dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}
