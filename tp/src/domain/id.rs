//! Trip ID generation
//!
//! Trip IDs use the format: `{6-char-hex}-trip-{city-slug}`
//! Example: `f3c2a1-trip-rome`

/// Generate a unique trip ID for a destination city
pub fn generate_trip_id(city: &str) -> String {
    let hex = uuid::Uuid::now_v7().simple().to_string();
    // The head of a v7 uuid is a timestamp shared by same-instant calls;
    // the tail is random, so the suffix comes from there
    let suffix = &hex[hex.len() - 6..];
    format!("{}-trip-{}", suffix, slugify(city))
}

/// Slugify a city name for use in IDs
fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        // Apostrophes vanish; any other non-alphanumeric becomes a hyphen
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
