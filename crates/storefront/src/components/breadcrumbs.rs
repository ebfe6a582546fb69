//! Breadcrumb trail with scroll-position preservation.
//!
//! The trail is a horizontally scrolling strip. Its offset is saved when the
//! shopper navigates away and restored after the next page renders.
//!
//! [`ScrollMemory`] holds a single slot under the fixed key
//! [`ScrollMemory::KEY`]: the offset restored on any page is the one last
//! saved on *any* page, not the one saved for the current path. It is owned
//! by the visitor session and handed to the component by the page.

use askama::Template;
use serde::{Deserialize, Serialize};

/// One link in the trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbItem {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl BreadcrumbItem {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// A saved scroll offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollSlot {
    pub key: String,
    /// Path the offset was saved on.
    pub path: String,
    pub offset: u32,
}

/// Scroll state for the breadcrumb strip. One slot, shared by every path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollMemory {
    slot: Option<ScrollSlot>,
}

impl ScrollMemory {
    /// The slot key. Fixed, independent of the path.
    pub const KEY: &'static str = "Breadcrumbs";

    /// Capture the offset before leaving `path`.
    pub fn save(&mut self, path: &str, offset: u32) {
        self.slot = Some(ScrollSlot {
            key: Self::KEY.to_string(),
            path: path.to_string(),
            offset,
        });
    }

    /// The offset to restore after `path` renders.
    ///
    /// Whatever was saved last, whichever path it was saved on.
    #[must_use]
    pub fn restore(&self, path: &str) -> Option<u32> {
        let slot = self.slot.as_ref()?;
        if slot.path != path {
            tracing::trace!(saved_on = %slot.path, path, "Restoring offset saved on another path");
        }
        Some(slot.offset)
    }
}

/// Breadcrumb trail component.
#[derive(Debug, Clone, Template)]
#[template(path = "components/breadcrumbs.html")]
pub struct Breadcrumbs {
    pub items: Vec<BreadcrumbItem>,
    /// Current path, posted back with the offset on navigation.
    pub path: String,
    /// Offset applied once the page has rendered.
    pub restore_offset: Option<u32>,
}

impl Breadcrumbs {
    /// Build the trail for `path`, restoring from `memory`.
    #[must_use]
    pub fn new(items: Vec<BreadcrumbItem>, path: &str, memory: &ScrollMemory) -> Self {
        Self {
            items,
            path: path.to_string(),
            restore_offset: memory.restore(path),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_is_empty_before_first_save() {
        assert_eq!(ScrollMemory::default().restore("/checkout"), None);
    }

    #[test]
    fn test_single_slot_restores_last_save_for_any_path() {
        let mut memory = ScrollMemory::default();
        memory.save("/collections/mugs", 120);
        memory.save("/collections/plates", 40);

        assert_eq!(memory.restore("/collections/mugs"), Some(40));
        assert_eq!(memory.restore("/checkout"), Some(40));
    }

    #[test]
    fn test_memory_serializes_with_fixed_key() {
        let mut memory = ScrollMemory::default();
        memory.save("/a", 7);
        let json = serde_json::to_value(&memory).unwrap();
        assert_eq!(json["slot"]["key"], "Breadcrumbs");

        let back: ScrollMemory = serde_json::from_value(json).unwrap();
        assert_eq!(back, memory);
    }

    #[test]
    fn test_render_separators_and_restore_offset() {
        let mut memory = ScrollMemory::default();
        memory.save("/", 33);
        let crumbs = Breadcrumbs::new(
            vec![
                BreadcrumbItem::new("1", "Home", "/"),
                BreadcrumbItem::new("2", "Checkout", "/checkout"),
            ],
            "/checkout",
            &memory,
        );

        let html = crumbs.render().unwrap();
        assert_eq!(html.matches("breadcrumbs__separator").count(), 1);
        assert!(html.contains(r#"data-restore-offset="33""#));
        assert!(html.contains(r#"href="/checkout""#));
    }
}
