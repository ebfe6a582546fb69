//! Primary navigation menu.
//!
//! Entries are plain links or mega-menu triggers whose panel is rendered in
//! a popover.

use askama::Template;

use crate::config::MenuLinkConfig;

/// A link inside the menu or one of its panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLink {
    pub title: String,
    pub href: String,
}

/// One top-level menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Link(MenuLink),
    MegaMenu { title: String, links: Vec<MenuLink> },
}

impl MenuEntry {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Link(link) => &link.title,
            Self::MegaMenu { title, .. } => title,
        }
    }

    /// Target of a plain link; `None` for mega-menus.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Link(link) => Some(&link.href),
            Self::MegaMenu { .. } => None,
        }
    }

    /// Panel links of a mega-menu; empty for plain links.
    #[must_use]
    pub fn panel_links(&self) -> &[MenuLink] {
        match self {
            Self::Link(_) => &[],
            Self::MegaMenu { links, .. } => links,
        }
    }
}

impl From<&MenuLinkConfig> for MenuLink {
    fn from(link: &MenuLinkConfig) -> Self {
        Self {
            title: link.title.clone(),
            href: link.href.clone(),
        }
    }
}

impl From<&MenuLinkConfig> for MenuEntry {
    fn from(entry: &MenuLinkConfig) -> Self {
        if entry.children.is_empty() {
            Self::Link(MenuLink::from(entry))
        } else {
            Self::MegaMenu {
                title: entry.title.clone(),
                links: entry.children.iter().map(MenuLink::from).collect(),
            }
        }
    }
}

/// Primary menu component.
#[derive(Debug, Clone, Template)]
#[template(path = "components/primary_menu.html")]
pub struct PrimaryMenu {
    pub entries: Vec<MenuEntry>,
}

impl PrimaryMenu {
    #[must_use]
    pub fn from_config(links: &[MenuLinkConfig]) -> Self {
        Self {
            entries: links.iter().map(MenuEntry::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_links_and_mega_menus() {
        let menu = PrimaryMenu {
            entries: vec![
                MenuEntry::Link(MenuLink {
                    title: "Sale".to_string(),
                    href: "/sale".to_string(),
                }),
                MenuEntry::MegaMenu {
                    title: "Kitchen".to_string(),
                    links: vec![MenuLink {
                        title: "Mugs".to_string(),
                        href: "/collections/mugs".to_string(),
                    }],
                },
            ],
        };

        let html = menu.render().unwrap();
        assert!(html.contains(r#"href="/sale""#));
        assert!(html.contains("popover"));
        assert!(html.contains(r#"href="/collections/mugs""#));
    }

    #[test]
    fn test_config_entries_with_children_become_mega_menus() {
        let config = MenuLinkConfig {
            title: "Kitchen".to_string(),
            href: String::new(),
            children: vec![MenuLinkConfig {
                title: "Mugs".to_string(),
                href: "/collections/mugs".to_string(),
                children: Vec::new(),
            }],
        };
        let menu = PrimaryMenu::from_config(&[config]);
        assert_eq!(menu.entries[0].href(), None);
        assert_eq!(menu.entries[0].panel_links().len(), 1);
    }

    #[test]
    fn test_empty_menu_renders_no_entries() {
        let html = PrimaryMenu::from_config(&[]).render().unwrap();
        assert!(!html.contains("<a "));
    }
}
