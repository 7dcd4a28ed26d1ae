//! Macro for implementing Display and FromStr for small domain enums
//!
//! Roles and RSVP states travel as lowercase strings in remote documents and
//! CLI arguments. This macro gives them a single, case-insensitive
//! conversion in both directions.
//!
//! # Example
//!
//! ```rust
//! use eventide_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Visibility {
//!     Public,
//!     Private,
//! }
//!
//! impl_domain_enum_conversions!(Visibility {
//!     Public => "public",
//!     Private => "private",
//! });
//! ```

/// Implements Display and FromStr traits for domain enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
