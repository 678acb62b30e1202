//! In-process user store built on `DashMap`.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::AppError;
use crate::models::{NewUser, User, columns};
use crate::repositories::UserStore;

/// User store kept in memory.
///
/// Ids come from a counter that only moves forward, so an id is never
/// handed out twice. The national id index is reserved through the map's
/// entry API, which makes the uniqueness check and the insert a single
/// step under concurrent registrations.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    rows: DashMap<BigDecimal, User>,
    by_national_id: DashMap<i64, BigDecimal>,
    last_id: AtomicI64,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        match self.by_national_id.entry(new_user.national_id) {
            Entry::Occupied(_) => Err(AppError::duplicate(
                columns::TABLE,
                columns::NATIONAL_ID,
                new_user.national_id,
            )),
            Entry::Vacant(slot) => {
                let user = User {
                    id: BigDecimal::from(self.last_id.fetch_add(1, Ordering::SeqCst) + 1),
                    national_id: new_user.national_id,
                    created_at: new_user.created_at,
                };
                // Row first, so a lookup through the index always finds it.
                self.rows.insert(user.id.clone(), user.clone());
                slot.insert(user.id.clone());
                Ok(user)
            }
        }
    }

    async fn find_by_id(&self, user_id: &BigDecimal) -> Result<Option<User>, AppError> {
        Ok(self.rows.get(user_id).map(|row| row.value().clone()))
    }

    async fn find_by_national_id(&self, national_id: i64) -> Result<Option<User>, AppError> {
        let Some(user_id) = self
            .by_national_id
            .get(&national_id)
            .map(|id| id.value().clone())
        else {
            return Ok(None);
        };
        self.find_by_id(&user_id).await
    }

    async fn list_paginated(&self, offset: i64, limit: i64) -> Result<(Vec<User>, i64), AppError> {
        let mut all: Vec<User> = self.rows.iter().map(|row| row.value().clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));

        let total = all.len() as i64;
        let page = all
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConstraintKind;
    use jiff::civil::date;
    use std::sync::Arc;

    fn new_user(national_id: i64) -> NewUser {
        NewUser {
            national_id,
            created_at: date(2024, 3, 7),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = MemoryUserRepository::new();

        let first = repo.create(new_user(100)).await.unwrap();
        let second = repo.create(new_user(200)).await.unwrap();

        assert_eq!(first.id, BigDecimal::from(1));
        assert_eq!(second.id, BigDecimal::from(2));
        assert_eq!(first.national_id, 100);
        assert_eq!(first.created_at, date(2024, 3, 7));
    }

    #[tokio::test]
    async fn test_duplicate_national_id_is_constraint_violation() {
        let repo = MemoryUserRepository::new();
        repo.create(new_user(42)).await.unwrap();

        match repo.create(new_user(42)).await.unwrap_err() {
            AppError::ConstraintViolation {
                kind,
                entity,
                field,
                value,
            } => {
                assert_eq!(kind, ConstraintKind::Unique);
                assert_eq!(entity, "user");
                assert_eq!(field, "cedula");
                assert_eq!(value.as_deref(), Some("42"));
            }
            other => panic!("Expected ConstraintViolation, got {:?}", other),
        }

        // The rejected insert leaves no row behind
        let (rows, total) = repo.list_paginated(0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_id_is_stable_across_reads() {
        let repo = MemoryUserRepository::new();
        let created = repo.create(new_user(7)).await.unwrap();
        repo.create(new_user(8)).await.unwrap();

        for _ in 0..3 {
            let by_id = repo.find_by_id(&created.id).await.unwrap().unwrap();
            let by_national = repo.find_by_national_id(7).await.unwrap().unwrap();
            assert_eq!(by_id, created);
            assert_eq!(by_national, created);
        }
    }

    #[tokio::test]
    async fn test_lookup_by_id_beyond_machine_integers() {
        let repo = MemoryUserRepository::new();
        repo.create(new_user(1)).await.unwrap();

        let huge = crate::utils::numeric_id::parse_id("99999999999999999999").unwrap();
        assert!(repo.find_by_id(&huge).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let repo = MemoryUserRepository::new();
        assert!(repo.find_by_id(&BigDecimal::from(1)).await.unwrap().is_none());
        assert!(repo.find_by_national_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_paginated_orders_by_id() {
        let repo = MemoryUserRepository::new();
        for national_id in [50, 10, 40, 20, 30] {
            repo.create(new_user(national_id)).await.unwrap();
        }

        let (page, total) = repo.list_paginated(2, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(
            page.iter().map(|u| u.id.clone()).collect::<Vec<_>>(),
            vec![BigDecimal::from(3), BigDecimal::from(4)]
        );
        assert_eq!(
            page.iter().map(|u| u.national_id).collect::<Vec<_>>(),
            vec![40, 20]
        );

        let (page, total) = repo.list_paginated(10, 2).await.unwrap();
        assert_eq!(total, 5);
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_admit_exactly_one() {
        let repo = Arc::new(MemoryUserRepository::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.create(new_user(99)).await })
            })
            .collect();

        let mut created = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::ConstraintViolation { .. }) => rejected += 1,
                Err(other) => panic!("unexpected error {:?}", other),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(rejected, 15);
    }
}
