//! Chalkboard Core Library
//!
//! Platform-agnostic data structures and interaction logic for the Chalkboard
//! infinite canvas: the viewport, the element model, selection and hit-testing,
//! undo history, and the pointer/keyboard state machine.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod elements;
pub mod history;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod state;
pub mod storage;
pub mod tools;

pub use camera::Viewport;
pub use canvas::{Canvas, CanvasDocument};
pub use config::{CanvasConfig, ConfigError};
pub use elements::{Element, ElementId, ElementTrait, SerializableColor};
pub use history::History;
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::Interaction;
pub use selection::{HandleKind, ManipulationState, MultiMoveState, Selection};
pub use state::{PersistedState, StateError};
pub use storage::{Storage, StorageError, StorageResult};
pub use tools::{ToolKind, ToolSettings};
