//! Common utility functions shared across the codebase.

/// Uppercases the first character of `text`, leaving the rest untouched.
///
/// # Examples
///
/// ```
/// use rivet::utils::capitalize;
///
/// assert_eq!(capitalize("piece"), "Piece");
/// assert_eq!(capitalize("Piece"), "Piece");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Lowercases the first character of `text`, leaving the rest untouched.
///
/// Used when deriving property names from accessor names (`getHealth` → `health`).
///
/// # Examples
///
/// ```
/// use rivet::utils::decapitalize;
///
/// assert_eq!(decapitalize("Health"), "health");
/// assert_eq!(decapitalize("health"), "health");
/// assert_eq!(decapitalize(""), "");
/// ```
pub fn decapitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("widget"), "Widget");
        assert_eq!(capitalize("w"), "W");
        assert_eq!(capitalize("Widget"), "Widget");
        assert_eq!(capitalize("123abc"), "123abc");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_decapitalize() {
        assert_eq!(decapitalize("Health"), "health");
        assert_eq!(decapitalize("H"), "h");
        assert_eq!(decapitalize("HTTP"), "hTTP");
        assert_eq!(decapitalize(""), "");
    }
}
