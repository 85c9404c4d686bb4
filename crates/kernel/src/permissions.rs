//! Capability tokens guarding admin pages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Access-control token required to open an admin page.
///
/// Operational pages need [`Capability::ManageFarm`]; configuration pages
/// need the narrower [`Capability::ManageSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageFarm,
    ManageSettings,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 2] = [Capability::ManageFarm, Capability::ManageSettings];

    /// The string token for this capability.
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::ManageFarm => "manage_farm",
            Capability::ManageSettings => "manage_settings",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde_token() {
        for cap in Capability::ALL {
            let json = serde_json::to_string(&cap).unwrap();
            assert_eq!(json, format!("\"{cap}\""));
        }
    }

    #[test]
    fn unknown_token_is_rejected() {
        assert!(serde_json::from_str::<Capability>("\"manage_everything\"").is_err());
    }

    #[test]
    fn serde_uses_snake_case_tokens() {
        let json = serde_json::to_string(&Capability::ManageSettings).unwrap();
        assert_eq!(json, "\"manage_settings\"");
    }
}
