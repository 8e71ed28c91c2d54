//! Title Status Policy
//!
//! Decides when a bundle's records receive a generated title. The status is a
//! pure function of the bundle configuration and is re-read on every call, so
//! configuration changes apply to the next generation attempt.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Activation policy of automatic titles for a bundle.
///
/// Serialized as the integers `0`, `1` and `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TitleStatus {
    /// Never generate.
    #[default]
    Disabled = 0,
    /// Always generate, replacing whatever title the record carries.
    Enabled = 1,
    /// Generate only when the record has no title.
    Optional = 2,
}

impl TitleStatus {
    /// Whether a record with the given current title should receive a generated one.
    ///
    /// The applied guard is checked separately by the engine.
    pub fn requires_title(self, current_title: &str) -> bool {
        match self {
            TitleStatus::Disabled => false,
            TitleStatus::Enabled => true,
            TitleStatus::Optional => current_title.is_empty(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TitleStatus::Disabled => "disabled",
            TitleStatus::Enabled => "enabled",
            TitleStatus::Optional => "optional",
        }
    }
}

impl TryFrom<u8> for TitleStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TitleStatus::Disabled),
            1 => Ok(TitleStatus::Enabled),
            2 => Ok(TitleStatus::Optional),
            other => Err(format!(
                "Invalid title status: {} (must be 0, 1 or 2)",
                other
            )),
        }
    }
}

impl From<TitleStatus> for u8 {
    fn from(status: TitleStatus) -> Self {
        status as u8
    }
}

impl fmt::Display for TitleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
