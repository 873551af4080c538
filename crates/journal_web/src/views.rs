//! HTML templates and page rendering.

use crate::error::WebError;
use crate::flash::Notice;
use axum::response::Html;
use handlebars::{Handlebars, TemplateError};
use journal_core::User;
use serde::Serialize;
use serde_json::Value;

const LAYOUT: &str = include_str!("../templates/layout.hbs");

const TEMPLATES: &[(&str, &str)] = &[
    ("login", include_str!("../templates/login.hbs")),
    ("signup", include_str!("../templates/signup.hbs")),
    ("dashboard", include_str!("../templates/dashboard.hbs")),
    ("entry_new", include_str!("../templates/entry_new.hbs")),
    ("entries", include_str!("../templates/entries.hbs")),
    ("entry_detail", include_str!("../templates/entry_detail.hbs")),
    ("journal_create", include_str!("../templates/journal_create.hbs")),
    ("journal_join", include_str!("../templates/journal_join.hbs")),
    ("calendar", include_str!("../templates/calendar.hbs")),
    ("not_found", include_str!("../templates/not_found.hbs")),
];

/// Registry of every page template, compiled once at startup.
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_partial("layout", LAYOUT)?;
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, source)?;
        }
        Ok(Self { registry })
    }

    pub fn render(&self, page: Page<'_>) -> Result<Html<String>, WebError> {
        let body = self.registry.render(page.template, &page)?;
        Ok(Html(body))
    }
}

/// Data for one rendered page. Page-specific values are flattened next to
/// the layout fields.
#[derive(Serialize)]
pub struct Page<'a> {
    #[serde(skip)]
    template: &'static str,
    title: &'static str,
    user: Option<&'a User>,
    notices: Vec<Notice>,
    #[serde(flatten)]
    data: Value,
}

impl<'a> Page<'a> {
    pub fn new(template: &'static str, title: &'static str) -> Self {
        Self {
            template,
            title,
            user: None,
            notices: Vec::new(),
            data: Value::Object(Default::default()),
        }
    }

    pub fn user(mut self, user: Option<&'a User>) -> Self {
        self.user = user;
        self
    }

    pub fn notices(mut self, notices: Vec<Notice>) -> Self {
        self.notices = notices;
        self
    }

    /// Page-specific values; must serialize to a JSON object.
    pub fn data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}
