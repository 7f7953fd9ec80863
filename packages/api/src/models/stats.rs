use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate numbers shown on the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_files: u64,
    /// File-type category to count.
    #[serde(default)]
    pub file_type_breakdown: BTreeMap<String, u64>,
    /// Username to count.
    #[serde(default)]
    pub files_per_user: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_stats() {
        let json = r#"{
            "total_files": 5,
            "file_type_breakdown": {"pdf": 2, "excel": 0, "txt": 3, "word": 0},
            "files_per_user": {"ada": 4, "bob": 1}
        }"#;
        let stats: DashboardStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_files, 5);
        assert_eq!(stats.file_type_breakdown["txt"], 3);
        assert_eq!(stats.files_per_user.keys().collect::<Vec<_>>(), ["ada", "bob"]);
    }
}
