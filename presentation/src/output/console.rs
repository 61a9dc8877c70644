//! Console output formatter for deliberation outcomes

use colored::{ColoredString, Colorize};
use council_application::use_cases::deliberate::stage_duration;
use council_domain::{Decision, DeliberationOutcome, DeliberationStage, Opinion, OpinionStatus};

/// Formats deliberation outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colored output on or off for the whole process
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Format the complete outcome: verdict, opinions, cross-examination, reasoning
    pub fn format(outcome: &DeliberationOutcome) -> String {
        let result = &outcome.result;
        let mut output = String::new();

        // Header
        output.push_str(&Self::header("Ethos Council Verdict"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Task:".cyan().bold(),
            outcome.task.task_id()
        ));
        output.push_str(&format!(
            "{} {}\n\n",
            "Content:".cyan().bold(),
            outcome.task.preview(80)
        ));

        // Verdict
        output.push_str(&format!(
            "{} {}\n",
            "Decision:".cyan().bold(),
            Self::decision(result.final_decision)
        ));
        output.push_str(&format!(
            "{} {:.2} ({} quality)\n",
            "Confidence:".cyan().bold(),
            result.confidence,
            result.deliberation_quality
        ));
        output.push_str(&format!(
            "{} {}, {} conflict(s) resolved\n",
            "Consensus:".cyan().bold(),
            if result.consensus_reached {
                "reached".green()
            } else {
                "not reached".yellow()
            },
            result.conflicts_resolved
        ));

        if !result.decision_scores.is_empty() {
            let scores: Vec<String> = result
                .decision_scores
                .iter()
                .map(|(decision, score)| format!("{} {:.2}", decision, score))
                .collect();
            output.push_str(&format!(
                "{} {}\n",
                "Scores:".cyan().bold(),
                scores.join(", ")
            ));
        }

        // Phase 1: opinions
        output.push_str(&Self::section_header(&format!(
            "Specialist Opinions ({} of {} participated)",
            outcome.participant_count(),
            result.agents_consulted
        )));
        for opinion in outcome.opinions.values() {
            output.push_str(&Self::opinion(opinion));
        }

        // Phase 2: cross-examination
        let cross_exam = &outcome.cross_examination;
        if !cross_exam.conflicts.is_empty() || !cross_exam.low_confidence.is_empty() {
            output.push_str(&Self::section_header("Cross-Examination"));
            for conflict in &cross_exam.conflicts {
                output.push_str(&format!(
                    "  {} {} voted {}\n",
                    "!".yellow(),
                    conflict.specialist_id,
                    conflict.decision
                ));
            }
            for id in &cross_exam.low_confidence {
                output.push_str(&format!("  {} {} has low confidence\n", "?".dimmed(), id));
            }
        }

        // Phase 3: synthesis
        output.push_str(&Self::section_header("Reasoning"));
        output.push_str(&format!("\n{}\n", Self::indent(&result.reasoning, "  ")));

        let timings = Self::timings(outcome);
        if !timings.is_empty() {
            output.push_str(&format!("\n{} {}\n", "Timing:".dimmed(), timings));
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &DeliberationOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the verdict only (concise output)
    pub fn format_verdict(outcome: &DeliberationOutcome) -> String {
        let result = &outcome.result;
        format!(
            "{} {} (confidence {:.2}, {}/{} specialists)\n",
            "Verdict:".bold(),
            Self::decision(result.final_decision),
            result.confidence,
            outcome.participant_count(),
            result.agents_consulted
        )
    }

    fn opinion(opinion: &Opinion) -> String {
        let title = if opinion.framework.is_empty() {
            opinion.specialist_id.to_string()
        } else {
            format!("{} ({})", opinion.specialist_id, opinion.framework)
        };

        match opinion.vote() {
            Some(decision) => {
                let fallback = if opinion.status == OpinionStatus::FellBack {
                    format!(" {}", "[fallback]".dimmed())
                } else {
                    String::new()
                };
                let mut out = format!(
                    "\n{}{}\n  {} at {:.2}\n{}\n",
                    format!("── {} ──", title).yellow().bold(),
                    fallback,
                    Self::decision(decision),
                    opinion.confidence,
                    Self::indent(&opinion.rationale, "  ")
                );
                for item in &opinion.evidence {
                    out.push_str(&format!("    * {}\n", item));
                }
                out
            }
            None => format!(
                "\n{}\n  {}: {}\n",
                format!("── {} ──", title).red().bold(),
                opinion.status.as_str(),
                opinion.rationale
            ),
        }
    }

    fn decision(decision: Decision) -> ColoredString {
        match decision {
            Decision::Allow => decision.as_str().green().bold(),
            Decision::Remove => decision.as_str().red().bold(),
            Decision::FlagForReview => decision.as_str().yellow().bold(),
        }
    }

    fn timings(outcome: &DeliberationOutcome) -> String {
        let phases = [
            ("dispatch", DeliberationStage::Dispatched, DeliberationStage::Examined),
            ("synthesis", DeliberationStage::Examined, DeliberationStage::Synthesized),
            ("total", DeliberationStage::Created, DeliberationStage::Complete),
        ];
        phases
            .iter()
            .filter_map(|(label, from, to)| {
                stage_duration(&outcome.lifecycle, *from, *to)
                    .map(|d| format!("{} {}ms", label, d.as_millis()))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{
        DeliberationLifecycle, DeliberationTask, ExaminationPolicy, ModerationContext,
        OpinionSet, SpecialistWeights, examine, synthesize,
    };

    fn outcome() -> DeliberationOutcome {
        colored::control::set_override(false);

        let task = DeliberationTask::create(
            "A satirical post about the mayor",
            ModerationContext::new(),
            1000,
        )
        .unwrap();
        let opinions: OpinionSet = [
            Opinion::succeeded("free_speech", Decision::Allow, 0.9, "Protected satire")
                .with_framework("Free Speech Ethics")
                .with_evidence(vec!["Speech category: artistic - satire".to_string()]),
            Opinion::fell_back("utilitarian", Decision::Allow, 0.45, "Low harm"),
            Opinion::succeeded("deontological", Decision::Remove, 0.7, "Possible defamation"),
            Opinion::timed_out("cultural", "did not answer within 5000ms"),
        ]
        .into_iter()
        .map(|o| (o.specialist_id.clone(), o))
        .collect();
        let cross_examination = examine(&opinions, &ExaminationPolicy::default());
        let weights = SpecialistWeights::equal(["free_speech", "utilitarian", "deontological", "cultural"]);
        let result = synthesize(&task, &opinions, &cross_examination, &weights);

        let mut lifecycle = DeliberationLifecycle::new();
        for stage in [
            DeliberationStage::Dispatched,
            DeliberationStage::Examined,
            DeliberationStage::Synthesized,
            DeliberationStage::Complete,
        ] {
            lifecycle.advance(stage).unwrap();
        }

        DeliberationOutcome {
            task,
            result,
            opinions,
            cross_examination,
            lifecycle,
        }
    }

    #[test]
    fn test_format_full_lists_every_specialist() {
        let text = ConsoleFormatter::format(&outcome());

        assert!(text.contains("Decision: ALLOW"));
        assert!(text.contains("3 of 4 participated"));
        assert!(text.contains("free_speech (Free Speech Ethics)"));
        assert!(text.contains("* Speech category: artistic - satire"));
        assert!(text.contains("[fallback]"));
        assert!(text.contains("TIMED_OUT: did not answer within 5000ms"));
        assert!(text.contains("deontological voted REMOVE"));
        assert!(text.contains("utilitarian has low confidence"));
        assert!(text.contains("Timing:"));
    }

    #[test]
    fn test_format_verdict() {
        let text = ConsoleFormatter::format_verdict(&outcome());
        assert!(text.starts_with("Verdict: ALLOW"));
        assert!(text.contains("3/4 specialists"));
    }

    #[test]
    fn test_format_json_is_parseable() {
        let json = ConsoleFormatter::format_json(&outcome());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["result"]["final_decision"], "ALLOW");
        assert_eq!(value["opinions"]["cultural"]["status"], "TIMED_OUT");
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
