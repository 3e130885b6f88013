//! String hygiene applied to textual input before validation or storage.

/// Trims and collapses blank to `None`: absent and whitespace-only input are
/// indistinguishable afterwards.
pub fn trim_or_null(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Trims but keeps an empty result as `Some("")`, so an explicit
/// empty-string input stays distinguishable from an absent one.
pub fn trim_preserve_empty(value: Option<&str>) -> Option<String> {
    Some(value?.trim().to_string())
}
