//! Definition records for facts and rules.

mod fact;
mod rule;

pub use fact::*;
pub use rule::*;

use serde::{Deserialize, Serialize};

/// The category a fact identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactKind {
    /// Observed by the patient or clinician; the usual input to a query.
    Symptom,
    /// A condition concluded from symptoms.
    Diagnosis,
    /// An action suggested for a diagnosis.
    Recommendation,
}

impl FactKind {
    /// Get the lowercase label of this kind.
    pub fn label(&self) -> &'static str {
        match self {
            FactKind::Symptom => "symptom",
            FactKind::Diagnosis => "diagnosis",
            FactKind::Recommendation => "recommendation",
        }
    }
}

impl std::fmt::Display for FactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(FactKind::Symptom.label(), "symptom");
        assert_eq!(FactKind::Diagnosis.to_string(), "diagnosis");
        assert_eq!(FactKind::Recommendation.to_string(), "recommendation");
    }

    #[test]
    fn test_kind_serde_lowercase() {
        let json = serde_json::to_string(&FactKind::Recommendation).unwrap();
        assert_eq!(json, "\"recommendation\"");

        let kind: FactKind = serde_json::from_str("\"symptom\"").unwrap();
        assert_eq!(kind, FactKind::Symptom);
    }
}
