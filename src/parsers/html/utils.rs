/// ASCII 空白字符
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// Element names whose text content is never treated as displayed copy
pub const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "input", "select", "textarea"];

/// Checks whether a string holds nothing but whitespace
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Checks whether an element name belongs to [`NON_CONTENT_ELEMENTS`]
pub fn is_non_content_element(name: &str) -> bool {
    NON_CONTENT_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}
