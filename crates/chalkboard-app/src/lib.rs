//! Chalkboard Application
//!
//! Hosts drawing surfaces: loads a document from storage, routes input into
//! the canvas, renders after every change, and saves on close.

mod host;

pub use host::{AppConfig, AppError, SurfaceHost};
