//! User card: avatar, name and contact links.

use askama::Template;

use super::RenderMode;
use crate::commerce::ActiveCustomer;

const PREVIEW_NAME: &str = "Jane Doe";
const PREVIEW_EMAIL: &str = "jane.doe@example.com";
const PREVIEW_PHONE: &str = "+36 1 234 5678";
const PREVIEW_IMAGE: &str = "/static/images/avatar-placeholder.png";

/// Props for [`UserCard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCardProps {
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub image_src: Option<String>,
    pub show_title: bool,
    pub show_email: bool,
    pub show_phone_number: bool,
    pub show_image: bool,
}

impl Default for UserCardProps {
    fn default() -> Self {
        Self {
            title: None,
            email: None,
            phone_number: None,
            image_src: None,
            show_title: true,
            show_email: false,
            show_phone_number: true,
            show_image: true,
        }
    }
}

impl From<&ActiveCustomer> for UserCardProps {
    fn from(customer: &ActiveCustomer) -> Self {
        let name = customer.full_name();
        Self {
            title: (!name.is_empty()).then_some(name),
            email: Some(customer.email_address.clone()),
            phone_number: customer.phone_number.clone(),
            show_email: true,
            ..Self::default()
        }
    }
}

/// User card component.
#[derive(Debug, Clone, Template)]
#[template(path = "components/user_card.html")]
pub struct UserCard {
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub image_src: Option<String>,
    /// Avatar fallback letter.
    pub initial: Option<char>,
}

impl UserCard {
    /// Resolve props for rendering.
    ///
    /// Hidden parts are dropped. Missing parts get placeholders only in
    /// [`RenderMode::Preview`].
    #[must_use]
    pub fn new(props: UserCardProps, mode: RenderMode) -> Self {
        let fill = |value: Option<String>, placeholder: &str| {
            value.or_else(|| mode.is_preview().then(|| placeholder.to_string()))
        };

        let name = fill(props.title, PREVIEW_NAME);
        let initial = name.as_deref().and_then(|name| name.chars().next());

        Self {
            title: name.filter(|_| props.show_title),
            email: fill(props.email, PREVIEW_EMAIL).filter(|_| props.show_email),
            phone_number: fill(props.phone_number, PREVIEW_PHONE)
                .filter(|_| props.show_phone_number),
            image_src: fill(props.image_src, PREVIEW_IMAGE).filter(|_| props.show_image),
            initial: initial.filter(|_| props.show_image),
        }
    }

    /// Whether the avatar block is rendered.
    #[must_use]
    pub const fn has_avatar(&self) -> bool {
        self.image_src.is_some() || self.initial.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_production_never_fabricates() {
        let card = UserCard::new(UserCardProps::default(), RenderMode::Production);
        assert_eq!(card.title, None);
        assert_eq!(card.phone_number, None);
        assert_eq!(card.image_src, None);
        assert!(!card.has_avatar());

        let html = card.render().unwrap();
        assert!(!html.contains(PREVIEW_NAME));
        assert!(!html.contains(PREVIEW_PHONE));
    }

    #[test]
    fn test_preview_fills_visible_parts_only() {
        let card = UserCard::new(UserCardProps::default(), RenderMode::Preview);
        assert_eq!(card.title.as_deref(), Some(PREVIEW_NAME));
        assert_eq!(card.phone_number.as_deref(), Some(PREVIEW_PHONE));
        // Email is hidden by default.
        assert_eq!(card.email, None);
        assert_eq!(card.initial, Some('J'));
    }

    #[test]
    fn test_real_props_render_contact_links() {
        let props = UserCardProps {
            title: Some("Anna Kovács".to_string()),
            phone_number: Some("+36301234567".to_string()),
            email: Some("anna@example.com".to_string()),
            show_email: true,
            ..UserCardProps::default()
        };
        let html = UserCard::new(props, RenderMode::Production).render().unwrap();

        assert!(html.contains("tel:+36301234567"));
        assert!(html.contains("mailto:anna@example.com"));
        assert!(html.contains(">A<"));
    }
}
