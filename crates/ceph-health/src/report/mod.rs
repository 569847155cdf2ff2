//! Health report model and rendering.
//!
//! Checks produce a [`HealthReport`] made only of data: leveled findings,
//! section banners and pod rows, grouped per check. Banners carry a severity
//! for styling only and never count towards the verdict. Output is a separate concern handled by a
//! [`ReportSink`], so the same report can go to the console, to JSON, or be
//! captured in tests.

pub mod console;

use serde::Serialize;

use crate::pods::PodRecord;

pub use console::ConsoleSink;

/// Severity tier of a finding, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    /// The check could not produce a verdict at all.
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Fatal => write!(f, "FATAL"),
        }
    }
}

/// A single classified message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, message)
    }
}

/// One line of a check's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Finding(Finding),
    /// Heading for the pod rows that follow it.
    Banner(Finding),
    Pod(PodRecord),
}

/// The checks run by the evaluator, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    MonPlacement,
    MonQuorum,
    OsdPlacement,
    PodStatus,
    PgStatus,
    MgrCount,
}

/// Output of one check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub check: CheckKind,
    pub title: String,
    pub entries: Vec<Entry>,
}

impl CheckReport {
    pub fn new(check: CheckKind, title: impl Into<String>) -> Self {
        Self {
            check,
            title: title.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, finding: Finding) {
        self.entries.push(Entry::Finding(finding));
    }

    pub fn push_banner(&mut self, banner: Finding) {
        self.entries.push(Entry::Banner(banner));
    }

    pub fn push_pod(&mut self, pod: PodRecord) {
        self.entries.push(Entry::Pod(pod));
    }

    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Finding(f) => Some(f),
            Entry::Banner(_) | Entry::Pod(_) => None,
        })
    }

    pub fn banners(&self) -> impl Iterator<Item = &Finding> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Banner(b) => Some(b),
            Entry::Finding(_) | Entry::Pod(_) => None,
        })
    }

    pub fn pods(&self) -> impl Iterator<Item = &PodRecord> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Pod(p) => Some(p),
            Entry::Finding(_) | Entry::Banner(_) => None,
        })
    }

    /// Number of findings at exactly `severity`. Banners are not counted.
    pub fn count(&self, severity: Severity) -> usize {
        self.findings().filter(|f| f.severity == severity).count()
    }

    pub fn worst(&self) -> Option<Severity> {
        self.findings().map(|f| f.severity).max()
    }
}

/// Output of a full evaluation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthReport {
    pub checks: Vec<CheckReport>,
}

impl HealthReport {
    pub fn push(&mut self, check: CheckReport) {
        self.checks.push(check);
    }

    pub fn check(&self, kind: CheckKind) -> Option<&CheckReport> {
        self.checks.iter().find(|c| c.check == kind)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.checks.iter().map(|c| c.count(severity)).sum()
    }

    pub fn worst(&self) -> Option<Severity> {
        self.checks.iter().filter_map(CheckReport::worst).max()
    }

    /// Walk the report in order, feeding every entry to `sink`.
    pub fn render(&self, sink: &mut dyn ReportSink) {
        for check in &self.checks {
            sink.begin_check(check);
            for entry in &check.entries {
                match entry {
                    Entry::Finding(f) => sink.finding(f),
                    Entry::Banner(b) => sink.banner(b),
                    Entry::Pod(p) => sink.pod(p),
                }
            }
            sink.end_check(check);
        }
    }
}

/// Destination for a rendered report.
pub trait ReportSink {
    fn begin_check(&mut self, check: &CheckReport);
    fn finding(&mut self, finding: &Finding);
    fn banner(&mut self, banner: &Finding) {
        self.finding(banner);
    }
    fn pod(&mut self, pod: &PodRecord);
    fn end_check(&mut self, _check: &CheckReport) {}
}
