//! Macro for wire-format enums
//!
//! Several small enums travel as lowercase strings on the wire (`shape`,
//! batch item `status`). This macro gives each of them a single mapping table
//! that drives `as_str`, `Display`, case-insensitive `FromStr`, and serde.
//!
//! # Example
//!
//! ```rust
//! use medref_domain::impl_wire_enum;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Detail {
//!     Brief,
//!     Verbose,
//! }
//!
//! impl_wire_enum!(Detail {
//!     Brief => "brief",
//!     Verbose => "verbose",
//! });
//!
//! assert_eq!(Detail::Brief.to_string(), "brief");
//! assert_eq!("VERBOSE".parse::<Detail>(), Ok(Detail::Verbose));
//! ```

/// Implements `as_str`, `Display`, `FromStr`, `Serialize` and `Deserialize`
/// for a fieldless enum from a variant-to-string table.
///
/// Parsing is case-insensitive; output always uses the table spelling.
#[macro_export]
macro_rules! impl_wire_enum {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation of this value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <std::borrow::Cow<'de, str> as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}
