//! Novel ("novelas") catalog entries
//!
//! The stored JSON keeps the catalog's Spanish field names
//! (`titulo`, `genero`, `capitulos`, `año`, `descripcion`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Novel {
    pub id: u64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "capitulos")]
    pub chapters: u32,
    #[serde(rename = "año")]
    pub year: i32,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when adding a novel to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNovel {
    pub title: String,
    pub genre: String,
    pub chapters: u32,
    pub year: i32,
    pub description: Option<String>,
    pub active: bool,
}

impl NewNovel {
    pub fn new(title: impl Into<String>, genre: impl Into<String>, chapters: u32, year: i32) -> Self {
        Self {
            title: title.into(),
            genre: genre.into(),
            chapters,
            year,
            description: None,
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Novel {
    pub fn create(id: u64, novel: NewNovel, at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: novel.title,
            genre: novel.genre,
            chapters: novel.chapters,
            year: novel.year,
            description: novel.description,
            active: novel.active,
            created_at: at,
            updated_at: at,
        }
    }
}
