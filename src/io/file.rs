use crate::error::{Result, TimelineError};
use crate::model::ScheduledItem;
use std::path::Path;

/// Save items to a JSON file.
pub fn save_items(items: &[ScheduledItem], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(items)?;
    std::fs::write(path, json).map_err(|e| TimelineError::io(path, e))
}

/// Load items from a JSON file.
pub fn load_items(path: &Path) -> Result<Vec<ScheduledItem>> {
    let json = std::fs::read_to_string(path).map_err(|e| TimelineError::io(path, e))?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn saved_items_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        let mut undated = ScheduledItem::new(
            "Brochure",
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 3).unwrap(),
        );
        undated.end = None;
        let items = vec![
            ScheduledItem::new(
                "Spring campaign",
                NaiveDate::from_ymd_opt(2025, 3, 25).unwrap(),
                NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
            )
            .with_client("Acme")
            .with_status("active"),
            undated,
        ];

        save_items(&items, &path).unwrap();
        assert_eq!(load_items(&path).unwrap(), items);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = load_items(&path).unwrap_err();
        assert!(matches!(err, TimelineError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }
}
