use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(AdministrationRoute {
    Oral => "oral",
    Intravenous => "intravenous",
    Intramuscular => "intramuscular",
    Subcutaneous => "subcutaneous",
});

impl AdministrationRoute {
    /// Human-readable label used in alert messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Oral => "Oral",
            Self::Intravenous => "Intravenous (IV)",
            Self::Intramuscular => "Intramuscular (IM)",
            Self::Subcutaneous => "Subcutaneous (SC)",
        }
    }
}

str_enum!(DoseMode {
    PerDose => "per_dose",
    PerDay => "per_day",
});

str_enum!(InteractionLevel {
    High => "high",
    Medium => "medium",
});
