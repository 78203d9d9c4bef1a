use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::types::{User, UserTableRow};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Converts a token lifetime into whole cookie days, never less than one.
///
/// A missing, zero or negative lifetime counts as one day.
pub fn expiry_days(expires_in: Option<f64>) -> i64 {
    match expires_in {
        Some(secs) if secs > 0.0 => ((secs / SECONDS_PER_DAY).ceil() as i64).max(1),
        _ => 1,
    }
}

/// Expiry instant `days` whole days after `now`.
///
/// Lifetimes past the end of year 9999 are clamped to it, so a backend
/// announcing an absurd `expires_in` still yields a storable cookie.
///
/// # Arguments
///
/// * `now` - The instant the cookie is written
/// * `days` - Cookie lifetime as returned by [`expiry_days`]
///
/// # Example
///
/// ```
/// let expires = expiry_from_days(Utc::now(), i64::MAX);
/// assert_eq!(expires, latest_expiry());
/// ```
pub fn expiry_from_days(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let latest = latest_expiry();
    TimeDelta::try_days(days)
        .and_then(|delta| now.checked_add_signed(delta))
        .map_or(latest, |expires| expires.min(latest))
}

/// Last instant a cookie may expire at: `9999-12-31T23:59:59Z`.
pub fn latest_expiry() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map_or(DateTime::<Utc>::MAX_UTC, |naive| naive.and_utc())
}

/// Normalizes a configured API base URL.
///
/// Whitespace and trailing slashes are dropped. Absolute `http(s)` URLs are
/// returned as-is, anything else is treated as a path on `origin`.
pub fn normalize_base_url(raw: &str, origin: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return trimmed.to_string();
    }

    let origin = origin.trim_end_matches('/');
    if trimmed.starts_with('/') {
        format!("{origin}{trimmed}")
    } else {
        format!("{origin}/{trimmed}")
    }
}

/// True when pages are served over an encrypted transport.
pub fn is_secure_origin(origin: &str) -> bool {
    origin.trim().to_ascii_lowercase().starts_with("https://")
}

/// Builds an `http://` origin from a bind address such as `127.0.0.1:3000`.
pub fn origin_from_addr(addr: &str) -> String {
    if addr.starts_with("http://") || addr.starts_with("https://") {
        addr.trim_end_matches('/').to_string()
    } else {
        format!("http://{addr}")
    }
}

pub fn user_table_rows(user: &User) -> Vec<UserTableRow> {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    vec![
        UserTableRow {
            field: "Id".to_string(),
            value: user.id.clone(),
        },
        UserTableRow {
            field: "Name".to_string(),
            value: or_dash(&user.display_name),
        },
        UserTableRow {
            field: "Email".to_string(),
            value: or_dash(&user.email),
        },
        UserTableRow {
            field: "Country".to_string(),
            value: or_dash(&user.country),
        },
        UserTableRow {
            field: "Plan".to_string(),
            value: or_dash(&user.product),
        },
        UserTableRow {
            field: "Followers".to_string(),
            value: user.followers.total.to_string(),
        },
    ]
}

/// Escapes text for use inside HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
