//! Process exit codes of the `produce` binary.

use crate::domain::pipeline::RunReport;
use crate::domain::plan::PlanError;

pub const EXIT_DONE: u8 = 0;
pub const EXIT_FAILED: u8 = 1;
pub const EXIT_PLAN_MISSING: u8 = 2;
pub const EXIT_PLAN_INVALID: u8 = 3;

/// Exit code for a plan that could not be loaded
pub fn plan_error_exit_code(err: &PlanError) -> u8 {
    match err {
        PlanError::NotFound(_) => EXIT_PLAN_MISSING,
        PlanError::Malformed(_) | PlanError::Invalid(_) => EXIT_PLAN_INVALID,
        PlanError::Io(_) => EXIT_FAILED,
    }
}

pub fn report_exit_code(report: &RunReport) -> u8 {
    if report.is_done() {
        EXIT_DONE
    } else {
        EXIT_FAILED
    }
}
