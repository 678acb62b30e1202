//! Repository layer for data access operations.
//!
//! `UserStore` is the seam between the service layer and the storage
//! engine. Two implementations exist: PostgreSQL through diesel-async and
//! an in-process store for development and tests.

mod memory_user_repo;
mod user_repo;

pub use memory_user_repo::MemoryUserRepository;
pub use user_repo::UserRepository;

use std::sync::Arc;

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{NewUser, User};

/// Storage operations for user records.
///
/// Records are append-only: there is no update or delete. A duplicate
/// national id must be reported as `AppError::ConstraintViolation` with
/// kind `Unique`, whichever backend raised it.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new record and return it with its generated id.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, user_id: &BigDecimal) -> AppResult<Option<User>>;

    async fn find_by_national_id(&self, national_id: i64) -> AppResult<Option<User>>;

    /// One page of records ordered by id, plus the total record count.
    async fn list_paginated(&self, offset: i64, limit: i64) -> AppResult<(Vec<User>, i64)>;
}

/// Aggregates all repositories for convenient access.
///
/// Cloning is cheap; every field is reference counted.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserStore>,
}

impl Repositories {
    /// Repositories backed by PostgreSQL.
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool)),
        }
    }

    /// Repositories backed by in-process maps. Contents are lost on exit.
    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
        }
    }
}
