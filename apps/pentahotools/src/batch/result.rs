//! Batch operation result types

/// Status of a single batch item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchItemStatus {
    Success,
    Failed,
}

/// Result for one row of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItemResult {
    /// Position of the row among the processed rows (0-based)
    pub index: usize,
    /// User name as written in the source
    pub name: String,
    pub status: BatchItemStatus,
    pub error: Option<String>,
}

/// Summary of a completed batch
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub operation: String,
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub items: Vec<BatchItemResult>,
    pub duration_ms: u64,
}

impl BatchResult {
    pub fn new(operation: &str, total: usize) -> Self {
        Self {
            operation: operation.to_string(),
            total,
            success_count: 0,
            failure_count: 0,
            items: Vec::with_capacity(total),
            duration_ms: 0,
        }
    }

    pub fn add_success(&mut self, index: usize, name: String) {
        self.success_count += 1;
        self.items.push(BatchItemResult {
            index,
            name,
            status: BatchItemStatus::Success,
            error: None,
        });
    }

    pub fn add_failure(&mut self, index: usize, name: String, error: String) {
        self.failure_count += 1;
        self.items.push(BatchItemResult {
            index,
            name,
            status: BatchItemStatus::Failed,
            error: Some(error),
        });
    }

    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count > 0
    }

    pub fn failed_items(&self) -> impl Iterator<Item = &BatchItemResult> {
        self.items
            .iter()
            .filter(|i| i.status == BatchItemStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_failed_items() {
        let mut result = BatchResult::new("import_users", 3);
        result.add_success(0, "alice".to_string());
        result.add_failure(1, "bob".to_string(), "No such role: Editor".to_string());
        result.add_success(2, "carol".to_string());

        assert_eq!(result.success_count, 2);
        assert_eq!(result.failure_count, 1);
        assert!(result.has_failures());

        let failed: Vec<&BatchItemResult> = result.failed_items().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].name, "bob");
        assert_eq!(failed[0].error.as_deref(), Some("No such role: Editor"));
    }

    #[test]
    fn test_empty_result_has_no_failures() {
        let result = BatchResult::new("import_users", 0);
        assert!(!result.has_failures());
        assert_eq!(result.failed_items().count(), 0);
    }
}
