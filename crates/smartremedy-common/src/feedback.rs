//! User feedback forwarded to the backend's issue tracker integration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SmartRemedyError;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;
pub const MAX_CONTEXT_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    #[default]
    Suggestion,
    Bug,
    Feature,
    Other,
}

impl FeedbackKind {
    pub const ALL: [FeedbackKind; 4] = [Self::Suggestion, Self::Bug, Self::Feature, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suggestion => "suggestion",
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Suggestion => "Suggestion",
            Self::Bug => "Bug / error",
            Self::Feature => "New feature",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackKind {
    type Err = SmartRemedyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SmartRemedyError::Validation(format!("Unknown feedback type: {s}")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Feedback {
    /// Enforces the same limits the feedback form advertises.
    pub fn validate(&self) -> crate::Result<()> {
        if self.title.trim().is_empty() {
            return Err(SmartRemedyError::Validation("Title is required.".into()));
        }
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(SmartRemedyError::Validation(format!(
                "Title must be at most {MAX_TITLE_CHARS} characters."
            )));
        }
        if self.description.trim().is_empty() {
            return Err(SmartRemedyError::Validation("Description is required.".into()));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(SmartRemedyError::Validation(format!(
                "Description must be at most {MAX_DESCRIPTION_CHARS} characters."
            )));
        }
        if self.context.as_deref().map_or(0, |c| c.chars().count()) > MAX_CONTEXT_CHARS {
            return Err(SmartRemedyError::Validation(format!(
                "Context must be at most {MAX_CONTEXT_CHARS} characters."
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReceipt {
    pub message: String,
    #[serde(default)]
    pub issue_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Feedback {
        Feedback {
            kind: FeedbackKind::Bug,
            title: "History table empty".into(),
            description: "Reports disappear after upload".into(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_feedback_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn blank_title_rejected() {
        let feedback = Feedback { title: "   ".into(), ..sample() };
        assert_eq!(feedback.validate().unwrap_err().user_message(""), "Title is required.");
    }

    #[test]
    fn long_context_rejected() {
        let feedback = Feedback { context: Some("x".repeat(MAX_CONTEXT_CHARS + 1)), ..sample() };
        assert!(feedback.validate().is_err());
    }

    #[test]
    fn kind_serialises_as_type() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "bug");
        assert!(json.get("email").is_none());
        assert_eq!("feature".parse::<FeedbackKind>().unwrap(), FeedbackKind::Feature);
    }
}
