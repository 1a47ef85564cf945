//! Template renderer.

use super::{
    TemplateError, COMMIT_MESSAGE_TEMPLATE, PR_BODY_TEMPLATE, PR_TITLE_TEMPLATE,
};
use crate::probe::CONFIG_FILE_NAME;
use crate::workflow::RewriteRule;
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Disable HTML escaping for markdown output
    hbs.register_escape_fn(no_escape);

    // Enable strict mode to catch missing variables
    hbs.set_strict_mode(true);

    hbs
}

/// Renders the texts attached to a configuration update.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the commit message.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn commit_message(&self, rule: &RewriteRule) -> Result<String, TemplateError> {
        self.render_template(COMMIT_MESSAGE_TEMPLATE, &template_data(rule))
    }

    /// Renders the pull request title.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn pr_title(&self, rule: &RewriteRule) -> Result<String, TemplateError> {
        self.render_template(PR_TITLE_TEMPLATE, &template_data(rule))
    }

    /// Renders the pull request body.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn pr_body(&self, rule: &RewriteRule) -> Result<String, TemplateError> {
        self.render_template(PR_BODY_TEMPLATE, &template_data(rule))
    }

    /// Renders a template with the given data.
    fn render_template(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}

fn template_data(rule: &RewriteRule) -> Value {
    json!({
        "file_name": CONFIG_FILE_NAME,
        "old_org": rule.old_org(),
        "new_org": rule.new_org(),
    })
}
