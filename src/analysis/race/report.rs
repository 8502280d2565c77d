//! Rendering a finished analysis into human- or machine-readable output
//! (SPEC_FULL.md §4.M, ambient stack). Grounded on the teacher's own
//! `deadlock_reporter.rs`, which walks each detected cycle and logs one
//! finding at a time; we do the same for race pairs, in text form via
//! `annotate-snippets` and in machine-readable form via `serde_json`.

use annotate_snippets::{Level, Renderer};
use serde::Serialize;

use crate::analysis::race::classifier::RacePair;
use crate::analysis::race::guarded_access::{GuardedAccess, OpKind};
use crate::ssa::{Program, SourcePosition};

#[derive(Debug, Clone, Serialize)]
pub struct GuardedAccessSummary {
    pub position: String,
    pub op_kind: String,
    pub goroutine_id: u64,
}

impl GuardedAccessSummary {
    fn from_access(program: &dyn Program, access: &GuardedAccess) -> Self {
        let position: SourcePosition = program.position(access.position);
        Self {
            position: position.to_string(),
            op_kind: match access.op_kind {
                OpKind::Read => "read".to_string(),
                OpKind::Write => "write".to_string(),
            },
            goroutine_id: access.goroutine_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RaceFinding {
    pub first: GuardedAccessSummary,
    pub second: GuardedAccessSummary,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct RaceReport {
    pub findings: Vec<RaceFinding>,
}

impl RaceReport {
    pub fn build(program: &dyn Program, races: &[RacePair]) -> Self {
        let findings = races
            .iter()
            .map(|pair| RaceFinding {
                first: GuardedAccessSummary::from_access(program, &pair.first),
                second: GuardedAccessSummary::from_access(program, &pair.second),
            })
            .collect();
        Self { findings }
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

pub trait Reporter {
    fn render(&self, report: &RaceReport) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct TextReporter;

impl Reporter for TextReporter {
    fn render(&self, report: &RaceReport) -> String {
        if report.is_clean() {
            return "racex: no data races found".to_string();
        }
        let renderer = Renderer::styled();
        let mut out = String::new();
        for finding in &report.findings {
            let title = format!(
                "data race between goroutine {} ({} at {}) and goroutine {} ({} at {})",
                finding.first.goroutine_id,
                finding.first.op_kind,
                finding.first.position,
                finding.second.goroutine_id,
                finding.second.op_kind,
                finding.second.position,
            );
            let message = Level::Error.title(&title);
            out.push_str(&renderer.render(message).to_string());
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn render(&self, report: &RaceReport) -> String {
        serde_json::to_string_pretty(report)
            .unwrap_or_else(|err| format!("{{\"error\": \"{err}\"}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::race::guarded_access::GuardedAccess;
    use crate::analysis::race::lockset::Lockset;
    use crate::analysis::race::primitives::{IntStack, VectorClock};
    use crate::ssa::{InMemoryProgram, Pos, Value};

    fn access(id: u64, task: u64) -> GuardedAccess {
        GuardedAccess {
            id,
            position: Pos(1),
            value: Value(1),
            op_kind: OpKind::Write,
            lockset: Lockset::new(),
            goroutine_id: task,
            clock: VectorClock::new(),
            stack_trace: IntStack::new(),
        }
    }

    #[test]
    fn clean_report_renders_as_clean_in_both_formats() {
        let report = RaceReport::default();
        assert!(TextReporter.render(&report).contains("no data races"));
        assert_eq!(JsonReporter.render(&report), serde_json::to_string_pretty(&report).unwrap());
    }

    #[test]
    fn one_finding_mentions_both_goroutines_in_text_report() {
        let program = InMemoryProgram::new();
        let pair = RacePair {
            first: access(1, 0),
            second: access(2, 1),
        };
        let report = RaceReport::build(&program, &[pair]);
        let rendered = TextReporter.render(&report);
        assert!(rendered.contains("goroutine 0"));
        assert!(rendered.contains("goroutine 1"));
    }
}
