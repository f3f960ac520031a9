//! Client library for the Mindscape memory-palace service.
//!
//! Upload a PDF document with [`UploadClient`] and get back a [`Palace`]:
//! structured learning content (concepts, a learning path, and a scene
//! description) generated server-side. [`ChatClient`] handles follow-up
//! questions about individual concepts.
//!
//! Transient server overload (503/504) is retried with exponential backoff;
//! every other failure surfaces to the caller as a typed [`ApiError`].

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::chat::{ChatClient, ChatRole, ChatTurn};
pub use client::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use client::UploadClient;
pub use config::Settings;
pub use error::ApiError;
pub use models::{Concept, EnvironmentConfig, EnvironmentObject, EnvironmentTheme, ObjectShape, Palace};
