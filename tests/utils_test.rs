use spotdash::types::{Followers, User};
use spotdash::utils::*;

use chrono::{TimeZone, Utc};

// Helper function to create a test user
fn create_test_user(display_name: Option<&str>) -> User {
    User {
        id: "user-1".to_string(),
        display_name: display_name.map(str::to_string),
        email: None,
        country: Some("DE".to_string()),
        product: Some("premium".to_string()),
        followers: Followers { total: 7 },
    }
}

#[test]
fn test_expiry_days() {
    // One hour still keeps the cookie for a whole day
    assert_eq!(expiry_days(Some(3600.0)), 1);

    // Exactly one day
    assert_eq!(expiry_days(Some(86_400.0)), 1);

    // Just over a day rounds up
    assert_eq!(expiry_days(Some(86_401.0)), 2);
    assert_eq!(expiry_days(Some(200_000.0)), 3);

    // Missing or nonsensical lifetimes fall back to one day
    assert_eq!(expiry_days(None), 1);
    assert_eq!(expiry_days(Some(0.0)), 1);
    assert_eq!(expiry_days(Some(-50.0)), 1);
}

#[test]
fn test_expiry_from_days() {
    let now = Utc.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap();
    let expiry = expiry_from_days(now, 2);

    assert_eq!(expiry, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
}

#[test]
fn test_expiry_from_days_clamps_huge_lifetimes() {
    let now = Utc.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap();
    let latest = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();

    assert_eq!(latest_expiry(), latest);
    // 1e13 seconds is far beyond what chrono can represent
    assert_eq!(expiry_from_days(now, expiry_days(Some(1e13))), latest);
    assert_eq!(expiry_from_days(now, expiry_days(Some(f64::INFINITY))), latest);
    assert_eq!(expiry_from_days(now, i64::MAX), latest);
}

#[test]
fn test_normalize_base_url() {
    let origin = "http://127.0.0.1:3000";

    // Absolute URLs lose trailing slashes only
    assert_eq!(
        normalize_base_url("http://localhost:8080/", origin),
        "http://localhost:8080"
    );
    assert_eq!(
        normalize_base_url("  https://api.example.com//  ", origin),
        "https://api.example.com"
    );

    // Relative values live on the local origin
    assert_eq!(
        normalize_base_url("/backend/", origin),
        "http://127.0.0.1:3000/backend"
    );
    assert_eq!(
        normalize_base_url("backend", origin),
        "http://127.0.0.1:3000/backend"
    );
}

#[test]
fn test_is_secure_origin() {
    assert!(is_secure_origin("https://dashboard.example.com"));
    assert!(is_secure_origin("HTTPS://dashboard.example.com"));
    assert!(!is_secure_origin("http://127.0.0.1:3000"));
    assert!(!is_secure_origin("127.0.0.1:3000"));
}

#[test]
fn test_origin_from_addr() {
    assert_eq!(origin_from_addr("127.0.0.1:3000"), "http://127.0.0.1:3000");
    assert_eq!(
        origin_from_addr("https://dash.example.com/"),
        "https://dash.example.com"
    );
}

#[test]
fn test_escape_html() {
    assert_eq!(
        escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
    );
    assert_eq!(escape_html("plain"), "plain");
}

#[test]
fn test_user_table_rows() {
    let rows = user_table_rows(&create_test_user(Some("Test User")));

    assert_eq!(rows.len(), 6);
    assert_eq!(rows[1].field, "Name");
    assert_eq!(rows[1].value, "Test User");

    // Missing values are shown as a dash
    assert_eq!(rows[2].field, "Email");
    assert_eq!(rows[2].value, "-");
    assert_eq!(rows[5].value, "7");

    let rows = user_table_rows(&create_test_user(None));
    assert_eq!(rows[1].value, "-");
}
