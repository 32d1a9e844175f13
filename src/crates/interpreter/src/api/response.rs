//! API response bodies

use serde::{Deserialize, Serialize};

use crate::agent::PlanReport;
use crate::executor::ExecutionLog;
use crate::plan::CommandPlan;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Success body for `/execute` and `/plan`: `{success:true, plan, logs}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub success: bool,
    pub plan: CommandPlan,
    pub logs: ExecutionLog,
}

impl From<PlanReport> for PlanResponse {
    fn from(report: PlanReport) -> Self {
        Self {
            success: true,
            plan: report.plan,
            logs: report.logs,
        }
    }
}
