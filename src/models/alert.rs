use serde::{Deserialize, Serialize};

/// Block must prevent submission; Warning is advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Block,
    Warning,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Warning => "warning",
        }
    }
}

/// Which check produced the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    EpinephrineRoute,
    MinimumAge,
    Allergy,
    Contraindication,
    TherapeuticDuplication,
    Interaction,
    AbsoluteCeiling,
    Overdose,
    Subdose,
    AdultDailyMax,
    Route,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EpinephrineRoute => "epinephrine_route",
            Self::MinimumAge => "minimum_age",
            Self::Allergy => "allergy",
            Self::Contraindication => "contraindication",
            Self::TherapeuticDuplication => "therapeutic_duplication",
            Self::Interaction => "interaction",
            Self::AbsoluteCeiling => "absolute_ceiling",
            Self::Overdose => "overdose",
            Self::Subdose => "subdose",
            Self::AdultDailyMax => "adult_daily_max",
            Self::Route => "route",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn block(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            severity: AlertSeverity::Block,
            kind,
            message: message.into(),
        }
    }

    pub fn warning(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            severity: AlertSeverity::Warning,
            kind,
            message: message.into(),
        }
    }

    pub fn is_block(&self) -> bool {
        self.severity == AlertSeverity::Block
    }
}
