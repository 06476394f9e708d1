use serde::{Deserialize, Serialize};

/// Counters behind the four dashboard summary fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_items: u64,
    pub pending_tasks: u64,
    pub new_reports: u64,
    pub items_to_delete: u64,
}

impl DashboardSummary {
    /// Field texts in display order.
    pub fn labels(&self) -> [String; 4] {
        [
            format!("Total Items: {}", self.total_items),
            format!("Pending Tasks: {}", self.pending_tasks),
            format!("New Reports: {}", self.new_reports),
            format!("Items to Delete: {}", self.items_to_delete),
        ]
    }
}
