//! Focus primitives
//!
//! Tab index parsing and the native focusability rules.

/// Parsed `tabindex` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// Negative value: focusable by script, skipped by sequential navigation
    Programmatic,
    /// Zero or positive: reachable with Tab
    Sequential(i32),
}

impl TabIndex {
    /// Parse an attribute value; invalid values behave as if absent
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Some(Self::Programmatic),
            Ok(n) => Some(Self::Sequential(n)),
            Err(_) => None,
        }
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}

/// Elements focusable without a `tabindex`
pub fn is_natively_focusable(tag: &str, has_href: bool) -> bool {
    match tag {
        "a" | "area" => has_href,
        "button" | "input" | "select" | "textarea" | "summary" | "iframe" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_index() {
        assert_eq!(TabIndex::parse("-1"), Some(TabIndex::Programmatic));
        assert_eq!(TabIndex::parse("0"), Some(TabIndex::Sequential(0)));
        assert!(TabIndex::parse(" 5 ").is_some_and(|t| t.is_sequential()));
        assert_eq!(TabIndex::parse("abc"), None);
    }

    #[test]
    fn test_native_focus() {
        assert!(is_natively_focusable("button", false));
        assert!(is_natively_focusable("a", true));
        assert!(!is_natively_focusable("a", false));
        assert!(!is_natively_focusable("div", false));
    }
}
