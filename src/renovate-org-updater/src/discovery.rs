//! Organization-wide repository discovery.
//!
//! Pages through an organization's repositories and keeps those in which
//! [`ConfigProbe`] finds the configuration file.

mod error;
mod repository;

pub use error::DiscoveryError;
pub use repository::{CrawlReport, DiscoveredRepository, SkippedRepository};

use crate::github::{ApiError, GitHubApi};
use crate::probe::{ConfigProbe, ProbeResult};
use crate::rate_limit::RateLimiter;
use std::collections::HashSet;
use tracing::{debug, info, info_span, warn, Instrument};

/// Page number of the first listing page.
const FIRST_PAGE: u32 = 1;

/// Consecutive rate limit rejections of one page tolerated before giving up.
pub const MAX_LISTING_RETRIES: u32 = 5;

/// Crawls an organization for repositories holding the configuration file.
pub struct OrgCrawler<'a, A: ?Sized> {
    api: &'a A,
    limiter: &'a RateLimiter,
}

impl<'a, A: GitHubApi + ?Sized> OrgCrawler<'a, A> {
    /// Creates a crawler.
    pub fn new(api: &'a A, limiter: &'a RateLimiter) -> Self {
        Self { api, limiter }
    }

    /// Lists every repository of `org` and probes each for the configuration file.
    ///
    /// Pages are requested until the server stops advertising a next page.
    /// When a page's rate limit metadata shows the budget exhausted, the
    /// crawler waits for the reset and requests the same page again; the
    /// repositories of the exhausted response are not probed.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] if listing a page fails for any reason other
    /// than rate limiting, or is rate limited more than
    /// [`MAX_LISTING_RETRIES`] times in a row.
    pub async fn crawl(&self, org: &str) -> Result<CrawlReport, DiscoveryError> {
        let span = info_span!("crawl", org = %org);

        async {
            info!("Finding repositories with renovate.json");

            let probe = ConfigProbe::new(self.api, self.limiter);
            let mut report = CrawlReport::default();
            let mut seen = HashSet::new();
            let mut page = FIRST_PAGE;
            let mut rejections = 0;

            loop {
                report.pages_fetched += 1;
                let listing = match self.api.list_org_repositories(org, page).await {
                    Ok(listing) => listing,
                    Err(ApiError::RateLimited { rate }) if rejections < MAX_LISTING_RETRIES => {
                        rejections += 1;
                        warn!(page, rejections, "Repository listing rate limited");
                        self.limiter.wait_for_reset(&rate).await;
                        continue;
                    }
                    Err(source) => {
                        return Err(DiscoveryError::ListFailed {
                            org: org.to_string(),
                            page,
                            source,
                        });
                    }
                };

                rejections = 0;

                info!(
                    page,
                    count = listing.repositories.len(),
                    "Found repositories in org"
                );

                if self.limiter.observe(listing.rate.as_ref()).await {
                    debug!(page, "Retrying page after rate limit reset");
                    continue;
                }

                for repository in &listing.repositories {
                    if !seen.insert(repository.full_name.clone()) {
                        debug!(repo = %repository.full_name, "Already scanned");
                        continue;
                    }
                    report.repositories_scanned += 1;

                    match probe.probe(repository).await {
                        ProbeResult::Found { path, .. } => {
                            report.matches.push(DiscoveredRepository {
                                repository: repository.clone(),
                                config_path: path,
                            });
                        }
                        ProbeResult::NotFound => {}
                        failed => {
                            let reason = failed.skip_reason().unwrap_or_default();
                            warn!(
                                repo = %repository.full_name,
                                reason = %reason,
                                "Skipping repository"
                            );
                            report.skipped.push(SkippedRepository {
                                full_name: repository.full_name.clone(),
                                reason,
                            });
                        }
                    }
                }

                match listing.next_page {
                    Some(next) if next > page => page = next,
                    _ => break,
                }
            }

            info!(
                found = report.matches.len(),
                scanned = report.repositories_scanned,
                skipped = report.skipped.len(),
                pages = report.pages_fetched,
                "Total repositories with renovate.json found"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }
}
