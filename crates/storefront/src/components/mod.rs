//! Presentational components.
//!
//! Each component is an askama [`Template`](askama::Template) built from
//! plain props and nested into pages with `{{ component|safe }}`. Components
//! never call the backend or touch the session; pages hand them everything
//! they render.
//!
//! Components that can show placeholder content for design previews take a
//! [`RenderMode`]. Placeholders only appear in [`RenderMode::Preview`];
//! production renders omit missing optional content.

pub mod breadcrumbs;
pub mod line_item_card;
pub mod page_title;
pub mod primary_menu;
pub mod summary;
pub mod user_card;

pub use breadcrumbs::{BreadcrumbItem, Breadcrumbs, ScrollMemory};
pub use line_item_card::LineItemCard;
pub use page_title::PageTitle;
pub use primary_menu::{MenuEntry, MenuLink, PrimaryMenu};
pub use summary::OrderSummary;
pub use user_card::{UserCard, UserCardProps};

/// Whether a component may fill missing props with placeholder content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Real pages: missing optional content is omitted.
    #[default]
    Production,
    /// Design previews: missing optional content gets fixed placeholders.
    Preview,
}

impl RenderMode {
    /// Whether placeholders may be rendered.
    #[must_use]
    pub const fn is_preview(self) -> bool {
        matches!(self, Self::Preview)
    }
}
