pub mod csv_import;
pub mod file;
pub mod settings;

pub use file::{load_tasks, save_tasks};
pub use settings::{load_scale_registry, load_settings, save_settings, AppSettings, ConfigPaths};
