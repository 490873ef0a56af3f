//! Performance project worksheets.
//!
//! A project captures preparation, in-the-arena notes, and an after-action
//! review for one performance event. Projects have no effect on scoring;
//! they are stored as JSON documents and cleared by the full reset.

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::storage::Database;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    pub what: String,
    pub who: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreNotes {
    pub vault_notes: Vec<String>,
    pub affirmations: Vec<String>,
    pub arena: Arena,
    pub flat_tires: Vec<String>,
    pub visualization_notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuringNotes {
    pub cba_uses: u32,
    pub shooter: bool,
    pub last_word_notes: Vec<String>,
}

/// After-action review: what happened, so what, now what.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aar {
    pub what: String,
    pub so_what: String,
    pub now_what: String,
}

/// Effort / strategy / preparation debrief.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Esp {
    pub effort: String,
    pub strategy: String,
    pub preparation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostNotes {
    pub aar: Aar,
    pub esp: Esp,
    pub confidence: u32,
}

/// One performance project worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub pre: PreNotes,
    #[serde(default)]
    pub during: DuringNotes,
    #[serde(default)]
    pub post: PostNotes,
}

impl Project {
    /// A new untitled-or-titled project with empty worksheets.
    pub fn new(title: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: if title.trim().is_empty() {
                "Untitled Project".to_string()
            } else {
                title.to_string()
            },
            created_at: Utc::now(),
            pre: PreNotes::default(),
            during: DuringNotes::default(),
            post: PostNotes::default(),
        }
    }
}

impl Database {
    /// Persist a new project.
    pub fn create_project(&self, project: &Project) -> Result<(), DatabaseError> {
        let body = serde_json::to_string(project)
            .map_err(|e| DatabaseError::QueryFailed(format!("project encode: {e}")))?;
        self.conn().execute(
            "INSERT INTO projects (id, title, created_at, body) VALUES (?1, ?2, ?3, ?4)",
            params![
                project.id,
                project.title,
                project.created_at.to_rfc3339(),
                body
            ],
        )?;
        Ok(())
    }

    /// Fetch a project by id.
    pub fn get_project(&self, id: &str) -> Result<Option<Project>, DatabaseError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT body FROM projects WHERE id = ?1")?;
        let result = stmt.query_row(params![id], |row| row.get::<_, String>(0));
        match result {
            Ok(body) => serde_json::from_str(&body)
                .map(Some)
                .map_err(|e| DatabaseError::QueryFailed(format!("project decode: {e}"))),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a stored project wholesale. Returns false when the id is
    /// unknown.
    pub fn update_project(&self, project: &Project) -> Result<bool, DatabaseError> {
        let body = serde_json::to_string(project)
            .map_err(|e| DatabaseError::QueryFailed(format!("project encode: {e}")))?;
        let changed = self.conn().execute(
            "UPDATE projects SET title = ?2, body = ?3 WHERE id = ?1",
            params![project.id, project.title, body],
        )?;
        Ok(changed > 0)
    }

    /// All projects, newest first. Unreadable rows are skipped with a
    /// warning.
    pub fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, body FROM projects ORDER BY created_at DESC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut projects = Vec::new();
        for row in rows {
            let (id, body) = row?;
            match serde_json::from_str(&body) {
                Ok(project) => projects.push(project),
                Err(e) => log::warn!("skipping unreadable project {id}: {e}"),
            }
        }
        Ok(projects)
    }
}
