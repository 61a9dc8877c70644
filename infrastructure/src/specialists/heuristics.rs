//! Keyword heuristics behind the reference specialists.
//!
//! Each framework scores the content against its indicator lists and maps
//! the scores to a decision. [`Depth::Full`] also reads the moderation
//! context; [`Depth::KeywordsOnly`] is the degraded fallback analysis and
//! reports lower confidence.

use super::framework::Framework;
use council_domain::{Decision, ModerationContext};

/// Confidence multiplier applied to keyword-only results
const FALLBACK_CONFIDENCE_FACTOR: f64 = 0.75;

const HARM_INDICATORS: &[&str] = &[
    "violence",
    "hate speech",
    "harassment",
    "misinformation",
    "discrimination",
    "bullying",
    "threats",
    "harmful content",
];

const BENEFIT_INDICATORS: &[&str] = &[
    "education",
    "awareness",
    "discussion",
    "satire",
    "artistic expression",
    "political speech",
    "scientific information",
    "public interest",
];

const RIGHTS_VIOLATIONS: &[&str] = &[
    "privacy violation",
    "defamation",
    "harassment",
    "discrimination",
    "intimidation",
    "coercion",
    "exploitation",
];

const DECEPTION_WORDS: &[&str] = &["fake", "false", "misleading", "hoax"];

const DIGNITY_WORDS: &[&str] = &["dehumanizing", "degrading", "humiliating"];

const CULTURAL_SENSITIVITIES: &[(&str, &[&str])] = &[
    ("religious", &["blasphemy", "sacrilege", "religious offense"]),
    (
        "ethnic",
        &["racial stereotypes", "ethnic slurs", "cultural appropriation"],
    ),
    (
        "gender",
        &["gender stereotypes", "sexism", "misogyny", "misandry"],
    ),
    ("national", &["national stereotypes", "xenophobia"]),
    ("generational", &["age stereotypes", "generational conflict"]),
];

const CULTURAL_BENEFITS: &[&str] = &[
    "cultural education",
    "diversity celebration",
    "cross cultural dialogue",
    "cultural awareness",
    "inclusive content",
];

const SPEECH_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "political",
        &["political speech", "government criticism", "policy discussion"],
    ),
    (
        "artistic",
        &["artistic expression", "creative content", "satire", "parody"],
    ),
    (
        "educational",
        &["educational content", "scientific discussion", "academic debate"],
    ),
    (
        "journalistic",
        &["news reporting", "investigative journalism", "public interest"],
    ),
    (
        "personal",
        &["personal opinion", "individual expression", "self expression"],
    ),
];

const SPEECH_RESTRICTIONS: &[&str] = &[
    "incitement to violence",
    "true threats",
    "fighting words",
    "obscenity",
    "defamation",
];

/// How much of the input the analysis may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Content and moderation context
    Full,
    /// Content keywords only
    KeywordsOnly,
}

/// Outcome of one heuristic analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub decision: Decision,
    pub confidence: f64,
    pub rationale: String,
    pub evidence: Vec<String>,
}

/// Analyze `content` from the perspective of `framework`
pub fn assess(
    framework: Framework,
    content: &str,
    context: &ModerationContext,
    depth: Depth,
) -> Assessment {
    let text = content.to_lowercase();
    let mut assessment = match framework {
        Framework::Utilitarian => utilitarian(&text, context, depth),
        Framework::Deontological => deontological(&text),
        Framework::Cultural => cultural(&text, context, depth),
        Framework::FreeSpeech => free_speech(&text, context, depth),
    };

    if depth == Depth::KeywordsOnly {
        assessment.confidence *= FALLBACK_CONFIDENCE_FACTOR;
        assessment.rationale = format!("Keyword-only fallback. {}", assessment.rationale);
    }
    assessment
}

fn found<'a>(text: &str, indicators: &'a [&'a str]) -> Vec<&'a str> {
    indicators
        .iter()
        .copied()
        .filter(|indicator| text.contains(indicator))
        .collect()
}

fn utilitarian(text: &str, context: &ModerationContext, depth: Depth) -> Assessment {
    let harms = found(text, HARM_INDICATORS);
    let benefits = found(text, BENEFIT_INDICATORS);

    let mut harm = 0.2 * harms.len() as f64;
    let mut benefit = 0.15 * benefits.len() as f64;
    if depth == Depth::Full {
        if context.audience_size() > 10_000 {
            harm *= 1.5;
        }
        if context.flag("vulnerable_audience") {
            harm *= 1.3;
        }
        if context.flag("educational_value") {
            benefit += 0.3;
        }
        if context.flag("public_interest") {
            benefit += 0.2;
        }
    }
    let harm = harm.min(1.0);
    let benefit = benefit.min(1.0);
    let net = benefit - harm;

    let (decision, confidence) = if net > 0.3 {
        (Decision::Allow, (net + 0.5).min(0.9))
    } else if net > -0.2 {
        (Decision::FlagForReview, 0.6)
    } else {
        (Decision::Remove, net.abs().min(0.9))
    };

    Assessment {
        decision,
        confidence,
        rationale: format!(
            "Utilitarian analysis: net utility {:.2} (benefits {:.2}, harms {:.2}); {} maximizes overall welfare.",
            net, benefit, harm, decision
        ),
        evidence: harms
            .iter()
            .chain(benefits.iter())
            .map(|i| format!("Contains '{}' indicators", i))
            .collect(),
    }
}

fn deontological(text: &str) -> Assessment {
    let mut serious = Vec::new();
    let mut moderate = Vec::new();

    for violation in found(text, RIGHTS_VIOLATIONS) {
        serious.push(format!("Potential {}", violation));
    }
    if !found(text, DIGNITY_WORDS).is_empty() {
        serious.push("Content may violate human dignity".to_string());
    }
    if !found(text, DECEPTION_WORDS).is_empty() {
        moderate.push("Potential deception or false information".to_string());
    }

    let (decision, confidence) = if !serious.is_empty() {
        (
            Decision::Remove,
            (0.7 + 0.1 * serious.len() as f64).min(0.95),
        )
    } else if !moderate.is_empty() {
        (Decision::FlagForReview, 0.7)
    } else {
        (Decision::Allow, 0.8)
    };

    Assessment {
        decision,
        confidence,
        rationale: format!(
            "Deontological analysis: {} serious and {} moderate violations of moral duty; {} respects rights and duties.",
            serious.len(),
            moderate.len(),
            decision
        ),
        evidence: serious.into_iter().chain(moderate).collect(),
    }
}

fn cultural(text: &str, context: &ModerationContext, depth: Depth) -> Assessment {
    let mut evidence = Vec::new();
    let mut hits = 0usize;
    for (category, indicators) in CULTURAL_SENSITIVITIES {
        for indicator in found(text, indicators) {
            hits += 1;
            evidence.push(format!("Cultural sensitivity: {} - {}", category, indicator));
        }
    }
    let benefits = found(text, CULTURAL_BENEFITS);
    evidence.extend(benefits.iter().map(|b| format!("Cultural benefit: {}", b)));

    let mut sensitivity = 0.2 * hits as f64;
    if depth == Depth::Full && context.target_cultures().iter().any(|c| c == "global") {
        sensitivity *= 1.2;
    }
    let sensitivity = sensitivity.min(1.0);
    let benefit = (0.25 * benefits.len() as f64).min(1.0);

    let (decision, confidence) = if sensitivity > 0.7 {
        (Decision::Remove, (sensitivity + 0.1).min(0.9))
    } else if sensitivity > 0.4 {
        (Decision::FlagForReview, 0.7)
    } else if benefit > 0.5 {
        (Decision::Allow, 0.8)
    } else {
        (Decision::Allow, 0.6)
    };

    Assessment {
        decision,
        confidence,
        rationale: format!(
            "Cultural analysis: sensitivity {:.2}, cultural benefit {:.2}; {} considering the target audience.",
            sensitivity, benefit, decision
        ),
        evidence,
    }
}

fn free_speech(text: &str, context: &ModerationContext, depth: Depth) -> Assessment {
    let mut evidence = Vec::new();
    let mut hits = 0usize;
    for (category, indicators) in SPEECH_CATEGORIES {
        for indicator in found(text, indicators) {
            hits += 1;
            evidence.push(format!("Speech category: {} - {}", category, indicator));
        }
    }
    let restrictions = found(text, SPEECH_RESTRICTIONS);
    evidence.extend(
        restrictions
            .iter()
            .map(|r| format!("Speech restriction: {}", r)),
    );

    let mut value = 0.2 * hits as f64;
    if depth == Depth::Full {
        if context.flag_or("public_platform", true) {
            value *= 1.2;
        }
        if context.flag("democratic_value") {
            value += 0.3;
        }
    }
    let value = value.min(1.0);

    let (decision, confidence) = if !restrictions.is_empty() {
        (Decision::Remove, 0.8)
    } else if value > 0.7 {
        (Decision::Allow, 0.9)
    } else if value > 0.4 {
        (Decision::Allow, 0.7)
    } else {
        (Decision::FlagForReview, 0.6)
    };

    Assessment {
        decision,
        confidence,
        rationale: format!(
            "Free speech analysis: speech value {:.2}, {} recognized restriction(s); {} prioritizing freedom of expression.",
            value,
            restrictions.len(),
            decision
        ),
        evidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(framework: Framework, content: &str) -> Assessment {
        assess(framework, content, &ModerationContext::new(), Depth::Full)
    }

    #[test]
    fn test_utilitarian_harm_outweighs_benefit() {
        let a = full(
            Framework::Utilitarian,
            "Violence and harassment and threats against people",
        );
        assert_eq!(a.decision, Decision::Remove);
        assert_eq!(a.evidence.len(), 3);
    }

    #[test]
    fn test_utilitarian_context_raises_benefit() {
        let context = ModerationContext::new()
            .with("educational_value", true)
            .with("public_interest", true);
        let a = assess(
            Framework::Utilitarian,
            "A discussion for awareness",
            &context,
            Depth::Full,
        );
        assert_eq!(a.decision, Decision::Allow);

        let fallback = assess(
            Framework::Utilitarian,
            "A discussion for awareness",
            &context,
            Depth::KeywordsOnly,
        );
        assert_eq!(fallback.decision, Decision::FlagForReview);
        assert!(fallback.rationale.starts_with("Keyword-only fallback"));
    }

    #[test]
    fn test_deontological_levels() {
        assert_eq!(
            full(Framework::Deontological, "This is defamation").decision,
            Decision::Remove
        );
        assert_eq!(
            full(Framework::Deontological, "A misleading hoax").decision,
            Decision::FlagForReview
        );
        let clean = full(Framework::Deontological, "Lovely weather today");
        assert_eq!(clean.decision, Decision::Allow);
        assert!(clean.evidence.is_empty());
    }

    #[test]
    fn test_cultural_global_audience_amplifies() {
        let content = "Full of racial stereotypes and xenophobia and sexism";
        let global = full(Framework::Cultural, content);
        assert_eq!(global.decision, Decision::Remove);

        let local_context = ModerationContext::new().with("target_cultures", vec!["fr"]);
        let local = assess(Framework::Cultural, content, &local_context, Depth::Full);
        assert_eq!(local.decision, Decision::FlagForReview);
    }

    #[test]
    fn test_free_speech_restriction_wins() {
        let a = full(
            Framework::FreeSpeech,
            "Political speech that ends in incitement to violence",
        );
        assert_eq!(a.decision, Decision::Remove);

        let satire = full(
            Framework::FreeSpeech,
            "Satire and parody as government criticism",
        );
        assert_eq!(satire.decision, Decision::Allow);
        assert!((satire.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_lowers_confidence() {
        let content = "news reporting on policy discussion";
        let full = full(Framework::FreeSpeech, content);
        let fallback = assess(
            Framework::FreeSpeech,
            content,
            &ModerationContext::new(),
            Depth::KeywordsOnly,
        );
        assert!(fallback.confidence < full.confidence);
    }
}
