//! Placard Core Library
//!
//! Platform-agnostic data model and editing logic for the Placard poster
//! editor: elements on a fixed-size canvas, the geometry engine behind drag,
//! resize and rotate, schema-driven property panels, undo history, the
//! template library and auto-saved persistence.

pub mod canvas;
pub mod config;
pub mod editor;
pub mod element;
pub mod export;
pub mod geometry;
pub mod history;
pub mod media;
pub mod schema;
pub mod storage;
pub mod templates;

pub use canvas::{Background, Canvas};
pub use config::EditorConfig;
pub use editor::{Collaborators, EditorCommand, EditorError, EditorSession, EditorWarning, Modifiers};
pub use element::{Color, Content, Element, ElementId, ElementKind, MediaRef, ShapeType, StyleValue};
pub use export::{ExportFormat, ExportService, JsonExporter};
pub use geometry::{Corner, Geometry, Guide};
pub use history::HistoryLog;
pub use media::{ImageSource, MediaFile};
pub use schema::{ControlPanel, ControlSchema, Tab, schema_for};
pub use storage::{AutoSaveManager, FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use templates::{Template, TemplateLibrary};
