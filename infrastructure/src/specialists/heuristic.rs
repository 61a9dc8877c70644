//! Heuristic specialist adapter
//!
//! Implements the [`Specialist`] port with the keyword heuristics of one
//! [`Framework`]. The primary evaluation uses the full moderation context;
//! the fallback is a keyword-only scan of the content.

use super::framework::Framework;
use super::heuristics::{Assessment, Depth, assess};
use async_trait::async_trait;
use council_application::ports::specialist::{Specialist, SpecialistError, SpecialistProfile};
use council_domain::{ModerationContext, Opinion};
use std::time::Duration;
use tracing::debug;

pub struct HeuristicSpecialist {
    profile: SpecialistProfile,
    framework: Framework,
    /// Artificial delay before the primary evaluation answers
    latency: Option<Duration>,
}

impl HeuristicSpecialist {
    /// Specialist with the framework's default id
    pub fn new(framework: Framework, weight: f64) -> Self {
        Self::with_id(framework.id(), framework, weight)
    }

    pub fn with_id(id: impl Into<String>, framework: Framework, weight: f64) -> Self {
        let id: String = id.into();
        Self {
            profile: SpecialistProfile::new(id, framework.label(), weight),
            framework,
            latency: None,
        }
    }

    /// Delay every primary evaluation, e.g. to exercise timeouts
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn framework_kind(&self) -> Framework {
        self.framework
    }

    fn to_opinion(&self, assessment: Assessment) -> Opinion {
        Opinion::succeeded(
            self.profile.id.clone(),
            assessment.decision,
            assessment.confidence,
            assessment.rationale,
        )
        .with_evidence(assessment.evidence)
        .with_framework(self.profile.framework.clone())
    }
}

#[async_trait]
impl Specialist for HeuristicSpecialist {
    fn profile(&self) -> &SpecialistProfile {
        &self.profile
    }

    async fn evaluate(
        &self,
        content: &str,
        context: &ModerationContext,
        _timeout: Duration,
    ) -> Result<Opinion, SpecialistError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let assessment = assess(self.framework, content, context, Depth::Full);
        debug!(
            specialist = %self.profile.id,
            decision = %assessment.decision,
            "Heuristic evaluation complete"
        );
        Ok(self.to_opinion(assessment))
    }

    fn fallback_evaluate(
        &self,
        content: &str,
        context: &ModerationContext,
    ) -> Result<Opinion, SpecialistError> {
        let assessment = assess(self.framework, content, context, Depth::KeywordsOnly);
        Ok(self.to_opinion(assessment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::Decision;

    #[tokio::test]
    async fn test_evaluate_uses_context() {
        let specialist = HeuristicSpecialist::new(Framework::Utilitarian, 0.25);
        let context = ModerationContext::new()
            .with("educational_value", true)
            .with("public_interest", true);

        let opinion = specialist
            .evaluate("a discussion for awareness", &context, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(opinion.specialist_id.as_str(), "utilitarian");
        assert_eq!(opinion.framework, "Utilitarianism");
        assert_eq!(opinion.decision, Some(Decision::Allow));

        let fallback = specialist
            .fallback_evaluate("a discussion for awareness", &context)
            .unwrap();
        assert_eq!(fallback.decision, Some(Decision::FlagForReview));
    }

    #[tokio::test]
    async fn test_latency_delays_answer() {
        let specialist = HeuristicSpecialist::with_id("slow", Framework::FreeSpeech, 1.0)
            .with_latency(Duration::from_millis(200));
        let result = tokio::time::timeout(
            Duration::from_millis(20),
            specialist.evaluate("hello", &ModerationContext::new(), Duration::from_millis(20)),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(specialist.id().as_str(), "slow");
    }
}
