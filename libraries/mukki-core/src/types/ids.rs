/// ID types for Mukki Player entities
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef},
    Decode, Encode, Sqlite, Type,
};

/// Declares a string-backed identifier with Display and SQLite codecs.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier
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

        #[cfg(feature = "sqlx")]
        impl Type<Sqlite> for $name {
            fn type_info() -> SqliteTypeInfo {
                <String as Type<Sqlite>>::type_info()
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'q> Encode<'q, Sqlite> for $name {
            fn encode_by_ref(
                &self,
                args: &mut Vec<SqliteArgumentValue<'q>>,
            ) -> Result<IsNull, BoxDynError> {
                <String as Encode<Sqlite>>::encode_by_ref(&self.0, args)
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'r> Decode<'r, Sqlite> for $name {
            fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
                let s = <String as Decode<Sqlite>>::decode(value)?;
                Ok($name(s))
            }
        }
    };
}

string_id!(
    /// Tile identifier, stable for the lifetime of a tile slot
    TileId
);

string_id!(
    /// External catalog identifier of an album or playlist
    MediaId
);

string_id!(
    /// External catalog identifier of a single track
    TrackId
);

impl TileId {
    /// Generate a new random tile ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}
