//! Ethical frameworks shipped with the reference council.

use std::str::FromStr;

/// One of the reference ethical perspectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framework {
    /// Weighs harm against benefit
    Utilitarian,
    /// Checks duties and rights violations
    Deontological,
    /// Evaluates cultural sensitivity for the target audience
    Cultural,
    /// Protects expression unless a recognized restriction applies
    FreeSpeech,
}

impl Framework {
    pub const ALL: [Framework; 4] = [
        Framework::Utilitarian,
        Framework::Deontological,
        Framework::Cultural,
        Framework::FreeSpeech,
    ];

    /// Default specialist id for this framework
    pub fn id(&self) -> &'static str {
        match self {
            Framework::Utilitarian => "utilitarian",
            Framework::Deontological => "deontological",
            Framework::Cultural => "cultural",
            Framework::FreeSpeech => "free_speech",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Framework::Utilitarian => "Utilitarianism",
            Framework::Deontological => "Deontological Ethics",
            Framework::Cultural => "Cultural Ethics",
            Framework::FreeSpeech => "Free Speech Ethics",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Framework::Utilitarian => {
                "Weighs potential harm against benefits for the greatest number"
            }
            Framework::Deontological => {
                "Evaluates content against universal moral principles and rights"
            }
            Framework::Cultural => "Evaluates content sensitivity across cultural contexts",
            Framework::FreeSpeech => {
                "Evaluates content by freedom of expression and democratic discourse"
            }
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "utilitarian" | "utilitarianism" => Ok(Framework::Utilitarian),
            "deontological" | "deontology" => Ok(Framework::Deontological),
            "cultural" | "cultural_context" => Ok(Framework::Cultural),
            "free_speech" | "freespeech" => Ok(Framework::FreeSpeech),
            other => Err(format!(
                "unknown framework '{}' (expected utilitarian, deontological, cultural or free_speech)",
                other
            )),
        }
    }
}
