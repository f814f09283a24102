//! A1-notation helpers for spreadsheet ranges.

/// Converts a 1-based column number to its letter name (1 → `A`, 27 → `AA`).
///
/// Bijective base-26 with no zero digit. Returns an empty string for 0.
#[must_use]
pub fn column_letter(column: u32) -> String {
    let mut n = column;
    let mut letters = Vec::new();
    while n > 0 {
        let remainder = (n - 1) % 26;
        n = (n - 1) / 26;
        // remainder < 26, so the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + remainder as u8));
    }
    letters.iter().rev().collect()
}

/// Prefixes `range` with a sheet title, quoting the title when it contains
/// anything other than ASCII letters, digits and underscores.
#[must_use]
pub fn a1_range(sheet_title: &str, range: &str) -> String {
    let plain = sheet_title
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain && !sheet_title.is_empty() {
        format!("{sheet_title}!{range}")
    } else {
        format!("'{}'!{range}", sheet_title.replace('\'', "''"))
    }
}
