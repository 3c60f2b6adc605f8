//! Generator module - writes post pages and the index listing

mod index;
mod post;

use chrono::{Local, NaiveDate};

use crate::content::HtmlRenderer;
use crate::templates::{LiteralTemplates, TemplateBackend};
use crate::Blog;

pub use index::{sort_newest_first, IndexUpdate};
pub use post::BuiltPost;

/// Builds post pages and regenerates the index for one site
pub struct Generator<'a> {
    blog: &'a Blog,
    renderer: &'a dyn HtmlRenderer,
    templates: Box<dyn TemplateBackend>,
    today: NaiveDate,
}

impl<'a> Generator<'a> {
    /// Create a generator using the literal placeholder templates
    pub fn new(blog: &'a Blog, renderer: &'a dyn HtmlRenderer) -> Self {
        Self {
            blog,
            renderer,
            templates: Box::new(LiteralTemplates),
            today: Local::now().date_naive(),
        }
    }

    /// Swap in another templating backend
    pub fn with_templates(mut self, templates: Box<dyn TemplateBackend>) -> Self {
        self.templates = templates;
        self
    }

    /// Date given to posts whose filename carries none
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}
