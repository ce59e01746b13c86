//! Closed string-valued enumerations.
//!
//! Every enumerated payload field is a Rust enum whose variants carry a
//! fixed wire spelling. [`wire_enum!`] declares such an enum together with
//! its [`WireEnum`] and `Serialize` implementations so the spelling lives in
//! exactly one place.

use pagination::SortOrder;

/// A closed set of string values with a fixed wire spelling.
pub trait WireEnum: Copy + Sized + 'static {
    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// Wire spelling of the variant.
    fn as_str(self) -> &'static str;

    /// Parse an exact wire spelling.
    #[must_use]
    fn from_wire(raw: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.as_str() == raw)
    }

    /// Comma-separated list of accepted spellings, for messages.
    #[must_use]
    fn expected() -> String {
        Self::VARIANTS
            .iter()
            .map(|variant| variant.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Declare a closed enum with wire spellings.
///
/// ```ignore
/// wire_enum! {
///     /// Document processing status.
///     pub enum DocumentStatus {
///         /// Ready for use.
///         Ok => "OK",
///     }
/// }
/// ```
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::wire_enum::WireEnum for $name {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::wire_enum::WireEnum::as_str(*self))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::wire_enum::WireEnum::as_str(*self))
            }
        }
    };
}

pub(crate) use wire_enum;

impl WireEnum for SortOrder {
    const VARIANTS: &'static [Self] = &[SortOrder::Asc, SortOrder::Desc];

    fn as_str(self) -> &'static str {
        SortOrder::as_str(self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    wire_enum! {
        /// Test palette.
        enum Colour {
            /// Red.
            Red => "red",
            /// Dark blue.
            DarkBlue => "DarkBlue",
        }
    }

    #[rstest]
    #[case("red", Some(Colour::Red))]
    #[case("DarkBlue", Some(Colour::DarkBlue))]
    #[case("darkblue", None)]
    #[case("", None)]
    fn parses_exact_spelling(#[case] raw: &str, #[case] expected: Option<Colour>) {
        assert_eq!(Colour::from_wire(raw), expected);
    }

    #[rstest]
    fn lists_expected_values() {
        assert_eq!(Colour::expected(), "red, DarkBlue");
        assert_eq!(SortOrder::expected(), "asc, desc");
    }

    #[rstest]
    fn serialises_wire_spelling() {
        let json = serde_json::to_string(&Colour::DarkBlue).expect("serialise");
        assert_eq!(json, "\"DarkBlue\"");
    }
}
