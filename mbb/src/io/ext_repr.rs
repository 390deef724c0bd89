use opack::{Counters, Placement, ProbeReport, RectDesc};
use serde::{Deserialize, Serialize};

/// External representation of a problem instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtInstance {
    #[serde(default)]
    pub name: Option<String>,
    pub rects: Vec<RectDesc>,
}

/// External representation of one box probe's outcome, written next to the
/// instance file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtReport {
    pub timestamp: String,
    pub box_width: i32,
    pub box_height: i32,
    pub feasible: bool,
    pub nodes: Counters,
    pub table_time_ms: f64,
    pub search_time_ms: f64,
    /// Empty when the box is infeasible
    pub placements: Vec<Placement>,
}

impl ExtReport {
    pub fn new(report: &ProbeReport) -> Self {
        ExtReport {
            timestamp: jiff::Timestamp::now().to_string(),
            box_width: report.box_dims.width,
            box_height: report.box_dims.height,
            feasible: report.feasible,
            nodes: report.counters,
            table_time_ms: report.table_time.as_secs_f64() * 1e3,
            search_time_ms: report.search_time.as_secs_f64() * 1e3,
            placements: report
                .solution
                .as_ref()
                .map(|s| s.placements.clone())
                .unwrap_or_default(),
        }
    }
}
