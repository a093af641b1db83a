//! Outcome of a permission-gated operation.

use std::fmt;

/// Why an actor was turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The actor cannot create or manage advertisements.
    NotAdvertiser { user_id: i64 },
    /// The actor cannot approve, reject or manage users.
    NotAdmin { user_id: i64 },
    /// The actor cannot search the catalog.
    NotClient { user_id: i64 },
    /// The actor does not own the resource.
    NotOwner {
        user_id: i64,
        resource: &'static str,
        id: i64,
    },
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::NotAdvertiser { user_id } => write!(f, "user {} is not an advertiser", user_id),
            Denial::NotAdmin { user_id } => write!(f, "user {} is not an administrator", user_id),
            Denial::NotClient { user_id } => write!(f, "user {} is not a client", user_id),
            Denial::NotOwner { user_id, resource, id } => {
                write!(f, "user {} does not own {} {}", user_id, resource, id)
            }
        }
    }
}

/// Either the operation's result or the reason it was refused.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Decision<T> {
    Allowed(T),
    Denied(Denial),
}

impl<T> Decision<T> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed(_))
    }

    pub fn is_denied(&self) -> bool {
        !self.is_allowed()
    }

    /// The result, if the operation was allowed.
    pub fn allowed(self) -> Option<T> {
        match self {
            Decision::Allowed(value) => Some(value),
            Decision::Denied(_) => None,
        }
    }

    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Decision::Allowed(_) => None,
            Decision::Denied(denial) => Some(denial),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decision<U> {
        match self {
            Decision::Allowed(value) => Decision::Allowed(f(value)),
            Decision::Denied(denial) => Decision::Denied(denial),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let allowed: Decision<i64> = Decision::Allowed(7);
        assert!(allowed.is_allowed());
        assert_eq!(allowed.map(|v| v * 2).allowed(), Some(14));

        let denied: Decision<i64> = Decision::Denied(Denial::NotAdmin { user_id: 3 });
        assert!(denied.is_denied());
        assert_eq!(denied.denial(), Some(&Denial::NotAdmin { user_id: 3 }));
        assert_eq!(denied.allowed(), None);
    }

    #[test]
    fn test_denial_display() {
        let denial = Denial::NotOwner {
            user_id: 4,
            resource: "Vehicle",
            id: 1,
        };
        assert_eq!(denial.to_string(), "user 4 does not own Vehicle 1");
    }
}
