// Output formatting: terminal display and report generation.

pub mod json;
pub mod markdown;
pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like emoji or accented letters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// `part` as a percentage of `total`, 0.0 when `total` is zero.
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

/// Signed integer delta, e.g. "+3", "-1", "0".
pub fn signed_count(delta: i64) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

/// Signed float delta with `decimals` places, e.g. "+0.25", "-1.10", "0.00".
pub fn signed_float(delta: f64, decimals: usize) -> String {
    let rounded = format!("{:.*}", decimals, delta.abs());
    let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
    if is_zero {
        rounded
    } else if delta > 0.0 {
        format!("+{rounded}")
    } else {
        format!("-{rounded}")
    }
}

/// Thousands separators for display counts: 12345 → "12,345".
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Make `text` safe inside a markdown table cell.
pub fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// A fixed-width text bar: `[=====     ]`.
pub fn bar(value: usize, max: usize, width: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        ((value as f64 / max as f64) * width as f64).round() as usize
    };
    let filled = filled.min(width);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(width - filled))
}
