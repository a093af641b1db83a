//! User roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The role a user is registered with. Never changes after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Advertiser,
    Client,
}

impl Role {
    /// All roles, in the order they are reported.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Advertiser, Role::Client];

    /// Value stored in the `usuarios.tipo` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Advertiser => "anunciante",
            Role::Client => "cliente",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "administrator",
            Role::Advertiser => "advertiser",
            Role::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" | "administrator" => Ok(Role::Admin),
            "anunciante" | "advertiser" => Ok(Role::Advertiser),
            "cliente" | "client" => Ok(Role::Client),
            other => Err(ValidationError::Invalid {
                field: "role".to_string(),
                reason: format!("unknown role '{}'", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_stored_value() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_accepts_english_aliases() {
        assert_eq!("Advertiser".parse::<Role>().unwrap(), Role::Advertiser);
        assert_eq!("client".parse::<Role>().unwrap(), Role::Client);
        assert!(matches!(
            "guest".parse::<Role>(),
            Err(ValidationError::Invalid { .. })
        ));
    }
}
