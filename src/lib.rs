//! Postgres Data Access Module
//!
//! This module provides a typed data-access layer for PostgreSQL: a
//! session factory handing out explicit session handles, a unit of work
//! scoping one transaction to one session with guaranteed
//! commit-or-rollback, and a generic repository issuing CRUD and query
//! operations per entity type.

pub mod config;
pub mod entity;
pub mod error;
pub mod predicate;
pub mod query;
pub mod repository;
pub mod session;
pub mod unit_of_work;

pub use config::DatabaseConfig;
pub use entity::{Entity, EntityId};
pub use error::{DataAccessError, DataAccessResult};
pub use predicate::{Predicate, SqlValue};
pub use query::{Query, SortDirection, SortSpec};
pub use repository::Repository;
pub use session::{Session, SessionFactory};
pub use unit_of_work::{TransactionAware, UnitOfWork};
