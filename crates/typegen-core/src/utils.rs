/// Uppercase the first character, leaving the rest untouched.
///
/// # Examples
/// ```
/// use typegen_core::utils::title_case;
/// assert_eq!(title_case("user"), "User");
/// assert_eq!(title_case("HTTPServer"), "HTTPServer");
/// ```
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a snake_case Rust identifier to the PascalCase descriptor field name.
///
/// A raw identifier prefix is dropped and every word is title-cased.
///
/// # Examples
/// ```
/// use typegen_core::utils::to_pascal_case;
/// assert_eq!(to_pascal_case("by_key"), "ByKey");
/// assert_eq!(to_pascal_case("r#type"), "Type");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    let s = s.strip_prefix("r#").unwrap_or(s);
    s.split('_').map(title_case).collect()
}

/// Convert PascalCase or camelCase to snake_case.
///
/// Runs of capitals are kept together as one word, so acronyms split where a
/// new capitalized word starts.
///
/// # Examples
/// ```
/// use typegen_core::utils::to_snake_case;
/// assert_eq!(to_snake_case("FooBar"), "foo_bar");
/// assert_eq!(to_snake_case("fooBar"), "foo_bar");
/// assert_eq!(to_snake_case("UserID"), "user_id");
/// assert_eq!(to_snake_case("HTTPServer"), "http_server");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let starts_word = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if starts_word && !result.ends_with('_') {
                result.push('_');
            }
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}
