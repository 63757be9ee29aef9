//! # Site Builder Persistence
//!
//! Stores projects (a name, an industry, a design document and generated
//! code) for a signed-in user. Every call takes an explicit [`Session`];
//! there is no process-wide client.
//!
//! Backends:
//! - [`MemoryProjectStore`] for tests and scratch sessions
//! - [`FileProjectStore`] for one JSON file per project on disk
//! - [`RestProjectStore`] for a hosted REST table

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod file;
pub mod memory;
pub mod project;
pub mod rest;
pub mod session;
pub mod store;

pub use error::{PersistError, PersistResult};
pub use file::FileProjectStore;
pub use memory::MemoryProjectStore;
pub use project::{NewProject, ProjectId, ProjectPatch, ProjectRecord};
pub use rest::RestProjectStore;
pub use session::Session;
pub use store::ProjectStore;
