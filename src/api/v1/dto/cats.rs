/*
 * Responsibility
 * - Cats の request/response DTO
 * - 公開 ID は encode 済みの値を返す (内部 ID を漏らさない)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MAX_NAME_LEN: usize = 64;

#[derive(Debug, Deserialize)]
pub struct CreateCatRequest {
    pub name: String,
    pub age: u8,
    pub breed: String,
}

impl CreateCatRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err("name must be <= 64 chars");
        }
        if self.breed.trim().is_empty() {
            return Err("breed is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCatRequest {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub breed: Option<String>,
}

impl UpdateCatRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name
            && (name.trim().is_empty() || name.len() > MAX_NAME_LEN)
        {
            return Err("name must be 1..=64 chars");
        }
        if let Some(breed) = &self.breed
            && breed.trim().is_empty()
        {
            return Err("breed cannot be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatResponse {
    pub id: String, // encoded
    pub name: String,
    pub age: u8,
    pub breed: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
