use std::path::Path;

use crate::error::{Result, TimelineError};
use crate::model::TaskCollection;

/// Save a task collection to a JSON file.
pub fn save_tasks(tasks: &TaskCollection, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(tasks)?;
    std::fs::write(path, json).map_err(|e| TimelineError::io(path, e))
}

/// Load a task collection from a JSON file.
pub fn load_tasks(path: &Path) -> Result<TaskCollection> {
    let json = std::fs::read_to_string(path).map_err(|e| TimelineError::io(path, e))?;
    let tasks: TaskCollection = serde_json::from_str(&json)?;
    log::info!("Loaded {} tasks from {:?}", tasks.len(), path);
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskDates;

    #[test]
    fn tasks_survive_a_save_and_load() {
        let path = std::env::temp_dir().join(format!("gantt-tasks-{}.json", uuid::Uuid::new_v4()));
        let mut tasks = TaskCollection::new();
        tasks.insert("t1".into(), TaskDates::new("2024-01-05", "2024-01-20"));
        tasks.insert("t2".into(), TaskDates::new("2024-02-01", "not yet"));

        save_tasks(&tasks, &path).unwrap();
        let loaded = load_tasks(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, tasks);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join(format!("gantt-missing-{}.json", uuid::Uuid::new_v4()));
        assert!(matches!(load_tasks(&path), Err(TimelineError::Io { .. })));
    }
}
