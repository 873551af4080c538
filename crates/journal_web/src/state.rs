//! State shared by every request.

use crate::views::Views;
use handlebars::TemplateError;
use journal_core::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(db: Database) -> Result<Self, TemplateError> {
        Ok(Self {
            db,
            views: Arc::new(Views::new()?),
        })
    }
}
