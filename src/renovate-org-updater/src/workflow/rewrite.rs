//! The literal rewrite applied to the configuration file.

/// Organization whose presets are being replaced.
pub const OLD_ORG: &str = "MyOrg";

/// Organization the presets move to.
pub const NEW_ORG: &str = "MyOtherOrg";

/// Replaces `github>{old}/` preset references with `github>{new}/`.
///
/// Matching is literal and case-sensitive; every occurrence is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    old_org: String,
    new_org: String,
    marker: String,
    replacement: String,
}

impl Default for RewriteRule {
    fn default() -> Self {
        Self::new(OLD_ORG, NEW_ORG)
    }
}

impl RewriteRule {
    /// Creates a rule moving presets from `old_org` to `new_org`.
    pub fn new(old_org: impl Into<String>, new_org: impl Into<String>) -> Self {
        let old_org = old_org.into();
        let new_org = new_org.into();
        Self {
            marker: format!("github>{old_org}/"),
            replacement: format!("github>{new_org}/"),
            old_org,
            new_org,
        }
    }

    /// Organization being replaced.
    #[must_use]
    pub fn old_org(&self) -> &str {
        &self.old_org
    }

    /// Organization replacing it.
    #[must_use]
    pub fn new_org(&self) -> &str {
        &self.new_org
    }

    /// Substring searched for, e.g. `github>MyOrg/`.
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Substring written instead, e.g. `github>MyOtherOrg/`.
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Number of marker occurrences in `text`.
    #[must_use]
    pub fn occurrences(&self, text: &str) -> usize {
        text.matches(self.marker.as_str()).count()
    }

    /// Replaces every marker occurrence.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.marker, &self.replacement)
    }
}

/// Whether a decoded configuration needs to be published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateDecision {
    /// Marker absent; nothing to do.
    NoMatch,

    /// Marker present but the run is a dry run.
    DryRunMatch,

    /// Marker present; rewrite, commit and open a pull request.
    MatchAndPublish,
}

impl UpdateDecision {
    /// Decides what to do with `text`.
    #[must_use]
    pub fn decide(rule: &RewriteRule, text: &str, dry_run: bool) -> Self {
        if !text.contains(rule.marker()) {
            Self::NoMatch
        } else if dry_run {
            Self::DryRunMatch
        } else {
            Self::MatchAndPublish
        }
    }
}
