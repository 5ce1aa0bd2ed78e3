//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Several domain enums travel as lowercase identifiers (stop reasons,
//! message roles). This macro generates both conversions from one table.
//!
//! # Example
//!
//! ```rust
//! use glassbox_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Llm,
//!     Tool,
//! }
//!
//! impl_wire_name_conversions!(Channel {
//!     Llm => "llm",
//!     Tool => "tool",
//! });
//! ```

/// Implements Display and FromStr for an enum with fixed wire names
///
/// Parsing ignores ASCII case and surrounding whitespace; formatting always
/// yields the table's spelling.
#[macro_export]
macro_rules! impl_wire_name_conversions {
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
                let normalized = s.trim().to_ascii_lowercase();
                $(if normalized == $str {
                    return Ok(Self::$variant);
                })+
                Err(format!("unknown {} '{}'", stringify!($enum_name), s))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Phase {
        Think,
        Act,
        Observe,
    }

    impl_wire_name_conversions!(Phase {
        Think => "think",
        Act => "act",
        Observe => "observe",
    });

    #[test]
    fn test_display_uses_wire_names() {
        assert_eq!(Phase::Think.to_string(), "think");
        assert_eq!(Phase::Observe.to_string(), "observe");
    }

    #[test]
    fn test_parse_ignores_case_and_whitespace() {
        assert_eq!(Phase::from_str("ACT").unwrap(), Phase::Act);
        assert_eq!(Phase::from_str("  Observe ").unwrap(), Phase::Observe);
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        let err = Phase::from_str("reflect").unwrap_err();
        assert_eq!(err, "unknown Phase 'reflect'");
        assert!(Phase::from_str("").is_err());
    }
}
