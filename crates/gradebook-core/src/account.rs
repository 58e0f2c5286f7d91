//! Account kinds and identities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The fixed set of account kinds that may log in.
///
/// Each kind is backed by its own storage partition; callers choose the
/// partition by matching on the kind, never by interpolating user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Student,
    Instructor,
}

impl AccountKind {
    pub const ALL: [AccountKind; 2] = [AccountKind::Student, AccountKind::Instructor];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Student => "student",
            AccountKind::Instructor => "instructor",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(AccountKind::Student),
            "instructor" => Ok(AccountKind::Instructor),
            other => Err(CoreError::InvalidAccountKind(other.to_string())),
        }
    }
}

/// An account row as loaded from the store, including its password hash.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub kind: AccountKind,
}

impl Account {
    /// The public view of this account.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            user_type: self.kind,
        }
    }
}

/// Authenticated identity returned to clients. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub user_type: AccountKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: 7,
            email: "ada@example.edu".to_string(),
            name: "Ada Lovelace".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            kind: AccountKind::Student,
        }
    }

    #[test]
    fn parses_known_kinds() {
        assert_eq!("student".parse::<AccountKind>().unwrap(), AccountKind::Student);
        assert_eq!(
            "instructor".parse::<AccountKind>().unwrap(),
            AccountKind::Instructor
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = "unknown".parse::<AccountKind>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidAccountKind(ref k) if k == "unknown"));
    }

    #[test]
    fn kind_parsing_is_case_sensitive() {
        assert!("Student".parse::<AccountKind>().is_err());
        assert!("".parse::<AccountKind>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        for kind in AccountKind::ALL {
            assert_eq!(kind.to_string().parse::<AccountKind>().unwrap(), kind);
        }
    }

    #[test]
    fn identity_copies_public_fields() {
        let identity = account().identity();
        assert_eq!(identity.id, 7);
        assert_eq!(identity.email, "ada@example.edu");
        assert_eq!(identity.name, "Ada Lovelace");
        assert_eq!(identity.user_type, AccountKind::Student);
    }

    #[test]
    fn identity_serializes_without_hash() {
        let json = serde_json::to_value(account().identity()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "email": "ada@example.edu",
                "name": "Ada Lovelace",
                "userType": "student",
            })
        );
        assert!(!json.to_string().contains("argon2"));
    }
}
