/*
 * Responsibility
 * - cats の CRUD (in-memory)
 * - guard chain からは参照されない。handler が呼ぶだけのドメイン側の collaborator
 */
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatRow {
    pub cat_id: u32,
    pub name: String,
    pub age: u8,
    pub breed: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u32,
    rows: BTreeMap<u32, CatRow>,
}

#[derive(Debug, Default)]
pub struct CatRepo {
    inner: RwLock<Inner>,
}

impl CatRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first.
    pub async fn list(&self) -> Vec<CatRow> {
        let inner = self.inner.read().await;
        inner.rows.values().rev().cloned().collect()
    }

    /// `None` once the id space is exhausted.
    pub async fn create(&self, name: &str, age: u8, breed: &str) -> Option<CatRow> {
        let mut inner = self.inner.write().await;
        inner.next_id = inner.next_id.checked_add(1)?;

        let now = Utc::now();
        let row = CatRow {
            cat_id: inner.next_id,
            name: name.to_string(),
            age,
            breed: breed.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(row.cat_id, row.clone());
        Some(row)
    }

    pub async fn get(&self, cat_id: u32) -> Option<CatRow> {
        self.inner.read().await.rows.get(&cat_id).cloned()
    }

    pub async fn update(
        &self,
        cat_id: u32,
        name: Option<&str>,
        age: Option<u8>,
        breed: Option<&str>,
    ) -> Option<CatRow> {
        let mut inner = self.inner.write().await;
        let row = inner.rows.get_mut(&cat_id)?;

        if let Some(name) = name {
            row.name = name.to_string();
        }
        if let Some(age) = age {
            row.age = age;
        }
        if let Some(breed) = breed {
            row.breed = breed.to_string();
        }
        row.updated_at = Utc::now();

        Some(row.clone())
    }

    pub async fn delete(&self, cat_id: u32) -> bool {
        self.inner.write().await.rows.remove(&cat_id).is_some()
    }
}
