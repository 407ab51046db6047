//! # Price Formatting
//!
//! Thousands-separator grouping for free-typed price text, and the inverse
//! parse. Stored prices are always plain `f64`; grouping exists only in text.

use crate::error::{Result, StorefrontError};

/// Separator inserted between digit groups
pub const GROUP_SEPARATOR: char = ',';

/// Insert grouping separators into the integer part of `input`.
///
/// A separator goes before every digit that starts a run of digits whose
/// length is a positive multiple of three, provided the preceding character
/// is a word character. The fractional part (after the first `.`) is copied
/// untouched. Non-numeric text passes through unchanged.
pub fn group_digits(input: &str) -> String {
    let (head, tail) = match input.find('.') {
        Some(i) => input.split_at(i),
        None => (input, ""),
    };

    let chars: Vec<char> = head.chars().collect();

    // digit run length starting at each index
    let mut runs = vec![0usize; chars.len() + 1];
    for i in (0..chars.len()).rev() {
        if chars[i].is_ascii_digit() {
            runs[i] = runs[i + 1] + 1;
        }
    }

    let mut out = String::with_capacity(input.len() + chars.len() / 3);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && is_word_char(chars[i - 1]) && runs[i] > 0 && runs[i] % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out.push_str(tail);
    out
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Remove every grouping separator
pub fn strip_grouping(text: &str) -> String {
    text.chars().filter(|&c| c != GROUP_SEPARATOR).collect()
}

/// Re-group live price input: strip whatever separators the user typed and
/// insert them where they belong.
pub fn regroup_input(text: &str) -> String {
    group_digits(&strip_grouping(text))
}

/// Parse human-entered price text.
///
/// Separators are stripped first. Anything that is not a non-negative finite
/// number is rejected with `StorefrontError::InvalidPrice`.
pub fn parse_price(text: &str) -> Result<f64> {
    let raw = strip_grouping(text);
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| StorefrontError::InvalidPrice(text.to_string()))?;

    if !value.is_finite() || value < 0.0 {
        return Err(StorefrontError::InvalidPrice(text.to_string()));
    }

    // normalize -0.0
    Ok(value + 0.0)
}

/// Display form of a price, grouped.
///
/// Two decimals when that is exact (`1234.5` -> `1,234.50`). Otherwise the
/// shortest decimal text that parses back to `price` (`1234.567` ->
/// `1,234.567`), so `parse_price(format_price(p)) == p` for every
/// non-negative finite `p`.
pub fn format_price(price: f64) -> String {
    let cents = format!("{:.2}", price);
    if cents.parse::<f64>().ok() == Some(price) {
        group_digits(&cents)
    } else {
        group_digits(&price.to_string())
    }
}

/// Item label with the first character upper-cased
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
