//! Users Domain
//!
//! User management backed by MongoDB: list, create, update and delete, with
//! Argon2 password hashing and a guard against deleting users that own notes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, loose JSON payloads → typed inputs
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, uniqueness, password hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← UserRepository / NoteRepository (MongoDB + in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, views, inputs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers,
//!     repository::{InMemoryNoteRepository, InMemoryUserRepository},
//!     service::UserService,
//! };
//!
//! let service = UserService::new(InMemoryUserRepository::new(), InMemoryNoteRepository::new());
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod password;
pub mod payload;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, router};
pub use models::{CreateUser, DeleteUser, MessageResponse, Note, UpdateUser, User, UserView};
pub use self::mongodb::{MongoNoteRepository, MongoUserRepository};
pub use password::Argon2Hasher;
pub use payload::{CreateUserPayload, DeleteUserPayload, UpdateUserPayload};
pub use repository::{
    InMemoryNoteRepository, InMemoryUserRepository, NoteRepository, UserRepository,
};
pub use service::UserService;
