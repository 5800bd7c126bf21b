use super::super::domain::{PropertyDetails, UNKNOWN};

/// Best-effort recovery of property details from page markdown such as
/// `- **Lot Size:** 5,000 sqft`. Fields that cannot be found or parsed fall
/// back to the placeholder defaults.
pub(crate) fn parse_details(markdown: &str) -> PropertyDetails {
    PropertyDetails {
        neighborhood: field_value(markdown, "neighborhood")
            .map(clean_text)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        has_pool: pool_value(markdown).map(parse_pool).unwrap_or(false),
        lot_size: field_value(markdown, "lot size")
            .and_then(leading_number)
            .unwrap_or(0.0),
        year_built: field_value(markdown, "year built")
            .and_then(leading_integer)
            .unwrap_or(0),
        condition: field_value(markdown, "condition")
            .map(clean_text)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

/// Text after the first colon of the first line whose label contains `key`
/// as whole words. Only the label side is searched, so `Air Conditioning:`
/// never answers for `condition` and `Notes: lot size unknown` never answers
/// for `lot size`.
fn field_value<'a>(markdown: &'a str, key: &str) -> Option<&'a str> {
    markdown.lines().find_map(|line| {
        let (label, value) = line.split_once(':')?;
        let value = value.trim();
        if value.is_empty() || !label_matches(label, key) {
            return None;
        }
        Some(value)
    })
}

/// Pools are often listed among amenities (`Features: Private pool, garage`),
/// so a labelled `Pool:` line wins and any value mentioning a pool is next.
fn pool_value(markdown: &str) -> Option<&str> {
    field_value(markdown, "pool").or_else(|| {
        markdown.lines().find_map(|line| {
            let (_, value) = line.split_once(':')?;
            let value = value.trim();
            label_matches(value, "pool").then_some(value)
        })
    })
}

fn label_matches(label: &str, key: &str) -> bool {
    let words = label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>();
    let key_words = key.split_whitespace().collect::<Vec<_>>();

    !key_words.is_empty()
        && words
            .windows(key_words.len())
            .any(|window| window.iter().zip(&key_words).all(|(a, b)| a == b))
}

/// Strips markdown emphasis left on the value side (`** Elm Park`).
fn clean_text(value: &str) -> String {
    value
        .trim_matches(|c: char| c == '*' || c == '_' || c == '`' || c.is_whitespace())
        .to_string()
}

fn parse_pool(value: &str) -> bool {
    let normalized = clean_text(value).to_lowercase();
    if normalized.starts_with("no") || normalized.starts_with("false") {
        return false;
    }
    normalized.starts_with("yes") || normalized.starts_with("true") || normalized.contains("pool")
}

fn leading_number(value: &str) -> Option<f64> {
    let digits = numeric_prefix(value, true);
    digits.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn leading_integer(value: &str) -> Option<u32> {
    numeric_prefix(value, false).parse::<u32>().ok()
}

fn numeric_prefix(value: &str, allow_fraction: bool) -> String {
    let trimmed = clean_text(value);
    let mut digits = String::new();
    let mut seen_dot = false;

    for c in trimmed.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ',' if !digits.is_empty() => {}
            '.' if allow_fraction && !seen_dot && !digits.is_empty() => {
                seen_dot = true;
                digits.push(c);
            }
            _ => break,
        }
    }

    digits.trim_end_matches('.').to_string()
}
