/// Truncate a string for column display, appending an ellipsis when the
/// value was cut. Works on character boundaries.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let mut truncated: String = s.chars().take(max_len - 3).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a longer description", 10), "a longe...");
        assert_eq!(truncate_string("abcdef", 2), "ab");
        assert_eq!(truncate_string("exact", 5), "exact");
    }
}
