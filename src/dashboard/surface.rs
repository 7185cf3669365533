use chrono::{DateTime, Utc};

use crate::dashboard::Resource;

pub type Row = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub usize);

/// Rendering target owned by exactly one application.
///
/// The host creates one surface per registered application and attaches it
/// once; afterwards only the owning application mutates it. Every mutation
/// bumps `revision` so the painter can skip frames that did not change.
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    title: String,
    columns: Vec<String>,
    body: Resource<Vec<Row>>,
    revision: u64,
    updated_at: Option<DateTime<Utc>>,
}

impl Surface {
    pub fn new(id: SurfaceId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            columns: Vec::new(),
            body: Resource::NotAsked,
            revision: 0,
            updated_at: None,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn body(&self) -> &Resource<Vec<Row>> {
        &self.body
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Table skeleton; built once per page lifetime
    pub fn set_columns(&mut self, columns: Vec<String>) {
        self.columns = columns;
        self.touch();
    }

    /// Marks the first request as outstanding. Rows already shown stay up
    /// while later refreshes are in flight.
    pub fn begin_refresh(&mut self) {
        if self.body.is_not_asked() {
            self.body = Resource::Loading;
            self.touch();
        }
    }

    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.body = Resource::Success(rows);
        self.updated_at = Some(Utc::now());
        self.touch();
    }

    pub fn set_failure(&mut self, message: impl Into<String>) {
        self.body = Resource::Failure(message.into());
        self.touch();
    }

    /// Drops displayed data, keeping the skeleton
    pub fn clear(&mut self) {
        self.body = Resource::NotAsked;
        self.updated_at = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}
