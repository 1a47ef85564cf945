//! Interpretation of raw GitHub responses: rate limit headers, `Link`
//! pagination and status classification.

use super::ApiError;
use crate::rate_limit::{unix_now, RateLimitSnapshot};
use url::Url;

/// Wait applied to a secondary rate limit that carries no `retry-after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Case-insensitive header lookup.
fn header_get<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Extracts rate limit info from GitHub response headers.
///
/// Returns `None` unless all of `x-ratelimit-limit`, `x-ratelimit-remaining`
/// and `x-ratelimit-reset` are present and numeric.
#[must_use]
pub fn parse_rate_limit(headers: &[(String, String)]) -> Option<RateLimitSnapshot> {
    let limit = header_get(headers, "x-ratelimit-limit")?.trim().parse().ok()?;
    let remaining = header_get(headers, "x-ratelimit-remaining")?
        .trim()
        .parse()
        .ok()?;
    let reset = header_get(headers, "x-ratelimit-reset")?.trim().parse().ok()?;

    Some(RateLimitSnapshot {
        remaining,
        limit,
        reset,
    })
}

/// Extracts the `page` query parameter of the `rel="next"` entry of a
/// `Link` header.
#[must_use]
pub fn parse_next_page(link_header: &str) -> Option<u32> {
    link_header.split(',').find_map(|part| {
        let mut target = None;
        let mut is_next = false;

        for segment in part.split(';') {
            let segment = segment.trim();
            if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                target = Some(inner);
            } else if let Some(rel) = segment.strip_prefix("rel=") {
                is_next = rel.trim_matches('"') == "next";
            }
        }

        if !is_next {
            return None;
        }

        let url = Url::parse(target?).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    })
}

/// Link header helper used by the client.
pub(crate) fn next_page_from_headers(headers: &[(String, String)]) -> Option<u32> {
    header_get(headers, "link").and_then(parse_next_page)
}

/// Maps a non-success response onto the [`ApiError`] taxonomy.
///
/// `429`, and `403` with an exhausted budget or a `retry-after` header, are
/// rate limit rejections; `404` is absence; everything else is a plain status
/// error.
#[must_use]
pub fn classify_failure(
    status: u16,
    resource: &str,
    headers: &[(String, String)],
    body: &str,
) -> ApiError {
    let rate = parse_rate_limit(headers);

    if status == 404 {
        return ApiError::NotFound {
            resource: resource.to_string(),
            rate,
        };
    }

    if status == 403 || status == 429 {
        let retry_after = header_get(headers, "retry-after").and_then(|v| v.trim().parse().ok());
        match (rate, retry_after) {
            (Some(rate), _) if rate.is_exhausted() => return ApiError::RateLimited { rate },
            (rate, Some(secs)) => {
                return ApiError::RateLimited {
                    rate: secondary_limit(rate, secs),
                }
            }
            (rate, None) if status == 429 => {
                return ApiError::RateLimited {
                    rate: secondary_limit(rate, DEFAULT_RETRY_AFTER_SECS),
                }
            }
            _ => {}
        }
    }

    ApiError::Status {
        status,
        resource: resource.to_string(),
        message: error_message(body),
    }
}

/// Builds an exhausted snapshot that resets after `retry_after` seconds.
fn secondary_limit(rate: Option<RateLimitSnapshot>, retry_after: u64) -> RateLimitSnapshot {
    RateLimitSnapshot {
        remaining: 0,
        limit: rate.map_or(0, |r| r.limit),
        reset: unix_now() + retry_after,
    }
}

/// Pulls `message` out of a GitHub JSON error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
