pub fn generate_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.to_lowercase().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_dash = true;
        } else if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
    }

    slug
}

/// Cuts `text` to `length` characters and appends `...`.
pub fn truncate_text(text: &str, length: usize) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }

    let cut: String = text.chars().take(length).collect();
    format!("{}...", cut.trim())
}

pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

pub fn is_valid_url(text: &str) -> bool {
    url::Url::parse(text).is_ok()
}

/// Rounded completion percentage, `0` when there is nothing to complete.
pub fn calculate_progress(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

/// `"1234.5"` -> `"$1,234.50"`; unparsable input is returned as is.
pub fn format_price(price: &str) -> String {
    let Ok(value) = price.trim().parse::<f64>() else {
        return price.to_string();
    };

    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Download name for the n-th (zero based) note of a lecture.
pub fn note_file_name(lecture_title: &str, index: usize) -> String {
    format!("{}-note-{}.pdf", lecture_title, index + 1)
}
