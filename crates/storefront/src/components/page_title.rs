//! Page heading.

use askama::Template;

/// Page title component. `sr_only` keeps the heading for screen readers but
/// hides it visually.
#[derive(Debug, Clone, Template)]
#[template(path = "components/page_title.html")]
pub struct PageTitle {
    pub title: String,
    pub sr_only: bool,
}

impl PageTitle {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sr_only: false,
        }
    }

    #[must_use]
    pub fn screen_reader_only(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sr_only: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sr_only_class() {
        let html = PageTitle::screen_reader_only("Checkout").render().unwrap();
        assert!(html.contains(r#"class="page-title sr-only""#));

        let html = PageTitle::new("Checkout").render().unwrap();
        assert!(!html.contains("sr-only"));
    }
}
