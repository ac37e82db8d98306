//! Cleanup of free-text city names typed by users or passed by assistants,
//! e.g. `"weather in Spain"` arrives here as `"in Spain"`.

use crate::error::WeatherError;

/// Longest first, so that "in the Hague" loses "in the" rather than "in".
const PREFIXES: [&str; 4] = ["in the", "near", "in", "at"];

/// Strips one leading natural-language prefix and surrounding whitespace.
///
/// A prefix only matches as a whole word: "Atlanta" and "Nearby" are kept.
/// Exactly one prefix is removed, so stacked prefixes leave the inner one in
/// place ("at in Paris" gives "in Paris"). Sanitizing again is a no-op unless
/// the output itself starts with a prefix.
pub fn sanitize_city(raw: &str) -> Result<String, WeatherError> {
    let trimmed = raw.trim();
    let city = strip_prefix(trimmed).trim();

    if city.is_empty() {
        return Err(WeatherError::InvalidInput(
            "city name must not be empty".to_string(),
        ));
    }

    Ok(city.to_string())
}

fn strip_prefix(input: &str) -> &str {
    for prefix in PREFIXES {
        let Some(head) = input.get(..prefix.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(prefix) {
            continue;
        }
        let rest = &input[prefix.len()..];
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return rest;
        }
    }
    input
}
