use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Self-reported lateness style from the onboarding quiz.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PersonalityType {
    Anxious,
    Optimistic,
    Procrastinator,
    External,
}

impl PersonalityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anxious => "anxious",
            Self::Optimistic => "optimistic",
            Self::Procrastinator => "procrastinator",
            Self::External => "external",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Anxious => "The Worrier",
            Self::Optimistic => "The Optimist",
            Self::Procrastinator => "The Last-Minute Rush",
            Self::External => "The Externally Focused",
        }
    }

    /// Reminder strategy the copy is tailored to.
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Anxious => {
                "Gradual confidence building with plenty of buffer time and positive reinforcement."
            }
            Self::Optimistic => {
                "Reality-based planning with gentle time tracking and realistic scheduling."
            }
            Self::Procrastinator => {
                "Early motivation triggers and breaking down preparation into smaller, manageable steps."
            }
            Self::External => {
                "Boundary setting and environmental cues to maintain focus on your timeline."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PersonalityTestResult {
    pub id: Uuid,
    pub user_id: Uuid,
    pub personality: String,
    pub answers: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personality_serde_matches_as_str() {
        for p in [
            PersonalityType::Anxious,
            PersonalityType::Optimistic,
            PersonalityType::Procrastinator,
            PersonalityType::External,
        ] {
            let json = serde_json::to_value(p).unwrap();
            assert_eq!(json, serde_json::Value::String(p.as_str().to_string()));
        }
    }

    #[test]
    fn test_unknown_personality_rejected() {
        let parsed = serde_json::from_str::<PersonalityType>("\"punctual\"");
        assert!(parsed.is_err());
    }
}
