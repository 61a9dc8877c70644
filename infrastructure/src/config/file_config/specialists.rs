//! Specialist entries from TOML (`[[specialists]]` array)

use crate::specialists::{Framework, HeuristicSpecialist};
use council_application::ports::specialist::Specialist;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One configured specialist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSpecialistConfig {
    /// Unique id within the council
    pub id: String,
    /// Ethical framework (`utilitarian`, `deontological`, `cultural`, `free_speech`)
    pub framework: String,
    /// Voting weight; 0 keeps the specialist on record but out of the vote
    pub weight: f64,
    pub enabled: bool,
}

impl Default for FileSpecialistConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            framework: String::new(),
            weight: 0.25,
            enabled: true,
        }
    }
}

impl FileSpecialistConfig {
    pub fn parse_framework(&self) -> Result<Framework, String> {
        self.framework.parse()
    }

    /// Build the specialist this entry describes
    pub fn build(&self) -> Result<Arc<dyn Specialist>, String> {
        let framework = self.parse_framework()?;
        Ok(Arc::new(HeuristicSpecialist::with_id(
            self.id.clone(),
            framework,
            self.weight,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_uses_configured_id_and_weight() {
        let entry = FileSpecialistConfig {
            id: "kant".to_string(),
            framework: "deontological".to_string(),
            weight: 0.4,
            enabled: true,
        };
        let specialist = entry.build().unwrap();
        assert_eq!(specialist.id().as_str(), "kant");
        assert_eq!(specialist.framework(), "Deontological Ethics");
        assert!((specialist.weight() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_build_rejects_unknown_framework() {
        let entry = FileSpecialistConfig {
            id: "x".to_string(),
            framework: "nihilism".to_string(),
            ..Default::default()
        };
        assert!(entry.build().is_err());
    }
}
