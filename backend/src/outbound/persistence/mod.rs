//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories here implement [`UserRepository`] and [`ChatRepository`] on
//! top of `diesel-async` with a `bb8` pool. Row structs and table definitions
//! stay private to this module; only the repositories, the pool, and the
//! migration runner are exported.
//!
//! ```ignore
//! use mindweaver::outbound::persistence::{DbPool, DieselChatRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/mindweaver")).await?;
//! let chats = DieselChatRepository::new(pool);
//! ```
//!
//! [`UserRepository`]: crate::domain::ports::UserRepository
//! [`ChatRepository`]: crate::domain::ports::ChatRepository

mod diesel_chat_repository;
mod diesel_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_chat_repository::DieselChatRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
