//! Template rendering using Handlebars.
//!
//! The pull request title, body and commit message are fixed texts
//! parameterized by the rewrite rule and the configuration file name.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};

/// Commit message template.
pub const COMMIT_MESSAGE_TEMPLATE: &str = "Update {{file_name}} to use {{new_org}}";

/// Pull request title template.
pub const PR_TITLE_TEMPLATE: &str = "@JiraIssue-xx | Update {{file_name}} to use {{new_org}}";

/// Pull request body template.
pub const PR_BODY_TEMPLATE: &str = "This PR updates the {{file_name}} configuration to use the {{new_org}} organization instead of {{old_org}}. (changes `github>{{old_org}}` to `github>{{new_org}}`)";
