//! Strongly-typed identifiers shared across the workspace.
//!
//! All identifiers are UUID newtypes so a ticket id can never be passed
//! where a user id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Parse an identifier from its string form.
            ///
            /// # Errors
            ///
            /// Returns the underlying [`uuid::Error`] if the string is not a
            /// valid UUID.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(uuid::Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_id! {
    /// Unique identifier for a user (attendee, verifier, organizer, admin).
    UserId
}

uuid_id! {
    /// Unique identifier for a marketplace event.
    EventId
}

uuid_id! {
    /// Unique identifier for a ticket.
    TicketId
}

uuid_id! {
    /// Unique identifier for a browser session.
    SessionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(TicketId::new(), TicketId::new());
        assert_ne!(UserId::new(), UserId::new());
    }

    #[test]
    fn id_round_trips_through_display() {
        let id = EventId::new();
        let parsed = EventId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(SessionId::parse("not-a-uuid").is_err());
    }
}
