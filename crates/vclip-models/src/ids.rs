//! Strongly-typed identifiers shared across the platform.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(u: Uuid) -> Self {
                Self(u)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(UserId);
uuid_id!(VideoId);
uuid_id!(VideoAssetId);
uuid_id!(TopicId);
uuid_id!(EntityId);
uuid_id!(TagId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_random_and_distinct() {
        assert_ne!(VideoId::new(), VideoId::new());
    }

    #[test]
    fn round_trips_through_display_and_parse() {
        let id = VideoId::new();
        let parsed: VideoId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
