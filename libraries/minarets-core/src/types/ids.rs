/// ID types for catalog entities
///
/// The media API is inconsistent about identifier encoding: most payloads
/// carry numeric ids while URLs and cached data use strings. Every id type
/// therefore deserializes from either form and always serializes as a string.
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new id from its string form
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(IdVisitor).map(Self)
            }
        }
    };
}

struct IdVisitor;

impl de::Visitor<'_> for IdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer identifier")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }
}

catalog_id!(
    /// Track identifier
    TrackId
);

catalog_id!(
    /// Concert identifier
    ConcertId
);

catalog_id!(
    /// Artist identifier
    ArtistId
);

catalog_id!(
    /// Playlist identifier
    PlaylistId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_numeric_and_string_ids() {
        let numeric: TrackId = serde_json::from_str("1234").unwrap();
        let text: TrackId = serde_json::from_str("\"1234\"").unwrap();
        assert_eq!(numeric, text);
        assert_eq!(numeric.as_str(), "1234");
    }

    #[test]
    fn serializes_as_string() {
        let id = ConcertId::from(77);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"77\"");
    }

    #[test]
    fn rejects_non_scalar_ids() {
        let result: Result<PlaylistId, _> = serde_json::from_str("[1]");
        assert!(result.is_err());
    }
}
