//! Console rendering of a health report.

use super::{CheckReport, Finding, ReportSink, Severity};
use crate::pods::PodRecord;
use crate::ui;

/// Prints findings as colored leveled lines and pods as tab-separated rows.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for ConsoleSink {
    fn begin_check(&mut self, check: &CheckReport) {
        ui::print_section(&check.title);
    }

    fn finding(&mut self, finding: &Finding) {
        match finding.severity {
            Severity::Info => ui::print_info(&finding.message),
            Severity::Warning => ui::print_warning(&finding.message),
            Severity::Error => ui::print_error(&finding.message),
            Severity::Fatal => ui::print_fatal(&finding.message),
        }
    }

    fn pod(&mut self, pod: &PodRecord) {
        ui::print_plain(&pod.row());
    }

    fn end_check(&mut self, _check: &CheckReport) {
        println!();
    }
}
