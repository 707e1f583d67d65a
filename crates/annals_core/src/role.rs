//! Role types for chat participants.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
///
/// Serialized in lowercase, which is what chat-completions endpoints expect.
///
/// # Examples
///
/// ```
/// use annals_core::Role;
///
/// assert_eq!(format!("{}", Role::System), "system");
/// assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the whole conversation
    #[display("system")]
    System,
    /// The request
    #[display("user")]
    User,
    /// Model output
    #[display("assistant")]
    Assistant,
}
