pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod id;
pub mod model;
pub mod templates;

pub use config::EditorConfig;
pub use error::{ConfigError, ExportError, ImportError, PropertyError};
pub use format::{
    EXPORT_FILE_NAME, ImportedLayout, export_layout, import_layout, read_layout_file,
    write_layout_file,
};
pub use history::History;
pub use id::ComponentId;
pub use model::*;
pub use templates::{BLANK_TEMPLATE_ID, DEVICE_TEMPLATES, Template, find_template};
