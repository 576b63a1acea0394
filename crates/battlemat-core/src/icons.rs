//! Token templates and the icon side-table.
//!
//! Persisted tokens only carry their `(kind, label)` lookup key. Renderable
//! icon handles live here and are re-attached by lookup after loading.

use crate::entities::{SerializableColor, Token, TokenKind};
use std::collections::HashMap;

/// Renderer-facing icon identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconHandle(pub &'static str);

impl IconHandle {
    /// Used when no template matches a token.
    pub const GENERIC: IconHandle = IconHandle("generic");
}

/// A selectable template for the place-token tool.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenTemplate {
    pub kind: TokenKind,
    pub label: String,
    pub color: SerializableColor,
    pub size: u32,
    pub icon: IconHandle,
}

impl TokenTemplate {
    pub fn new(kind: TokenKind, label: impl Into<String>, color: SerializableColor, size: u32, icon: &'static str) -> Self {
        Self {
            kind,
            label: label.into(),
            color,
            size: size.max(1),
            icon: IconHandle(icon),
        }
    }
}

/// Maps `(kind, label)` to icon handles.
#[derive(Debug, Clone)]
pub struct IconRegistry {
    templates: Vec<TokenTemplate>,
    by_key: HashMap<(TokenKind, String), usize>,
}

impl Default for IconRegistry {
    fn default() -> Self {
        Self::with_templates(default_templates())
    }
}

impl IconRegistry {
    pub fn with_templates(templates: Vec<TokenTemplate>) -> Self {
        let by_key = templates
            .iter()
            .enumerate()
            .map(|(i, t)| ((t.kind, t.label.clone()), i))
            .collect();
        Self { templates, by_key }
    }

    pub fn templates(&self) -> &[TokenTemplate] {
        &self.templates
    }

    pub fn template(&self, kind: TokenKind, label: &str) -> Option<&TokenTemplate> {
        self.by_key
            .get(&(kind, label.to_string()))
            .map(|&i| &self.templates[i])
    }

    /// The registered template for `(kind, label)`, or a 1x1 generic one
    /// colored by kind.
    pub fn template_or_generic(&self, kind: TokenKind, label: &str) -> TokenTemplate {
        self.template(kind, label).cloned().unwrap_or_else(|| {
            let color = match kind {
                TokenKind::Player => SerializableColor::blue(),
                TokenKind::Enemy => SerializableColor::red(),
                TokenKind::Npc => SerializableColor::rgb(245, 158, 11),
                TokenKind::Object => SerializableColor::rgb(107, 114, 128),
            };
            TokenTemplate::new(kind, label, color, 1, IconHandle::GENERIC.0)
        })
    }

    /// Icon for a token, falling back to the generic icon.
    pub fn icon_for(&self, token: &Token) -> IconHandle {
        token
            .label
            .as_deref()
            .and_then(|label| self.template(token.kind, label))
            .map(|t| t.icon.clone())
            .unwrap_or(IconHandle::GENERIC)
    }
}

/// Built-in template table.
pub fn default_templates() -> Vec<TokenTemplate> {
    vec![
        TokenTemplate::new(TokenKind::Player, "Fighter", SerializableColor::rgb(59, 130, 246), 1, "sword"),
        TokenTemplate::new(TokenKind::Player, "Wizard", SerializableColor::rgb(139, 92, 246), 1, "wand"),
        TokenTemplate::new(TokenKind::Player, "Rogue", SerializableColor::rgb(16, 185, 129), 1, "dagger"),
        TokenTemplate::new(TokenKind::Player, "Cleric", SerializableColor::rgb(250, 204, 21), 1, "shield"),
        TokenTemplate::new(TokenKind::Enemy, "Goblin", SerializableColor::rgb(239, 68, 68), 1, "goblin"),
        TokenTemplate::new(TokenKind::Enemy, "Orc", SerializableColor::rgb(220, 38, 38), 1, "axe"),
        TokenTemplate::new(TokenKind::Enemy, "Ogre", SerializableColor::rgb(185, 28, 28), 2, "club"),
        TokenTemplate::new(TokenKind::Enemy, "Dragon", SerializableColor::rgb(153, 27, 27), 3, "dragon"),
        TokenTemplate::new(TokenKind::Npc, "Merchant", SerializableColor::rgb(245, 158, 11), 1, "coins"),
        TokenTemplate::new(TokenKind::Object, "Chest", SerializableColor::rgb(120, 53, 15), 1, "chest"),
        TokenTemplate::new(TokenKind::Object, "Boulder", SerializableColor::rgb(107, 114, 128), 2, "rock"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::GridPoint;

    #[test]
    fn test_icon_lookup_by_kind_and_label() {
        let registry = IconRegistry::default();
        let token = Token::new("t".into(), GridPoint::new(0, 0), 1, TokenKind::Enemy, SerializableColor::red())
            .with_label("Goblin");
        assert_eq!(registry.icon_for(&token), IconHandle("goblin"));
    }

    #[test]
    fn test_icon_fallback() {
        let registry = IconRegistry::default();
        // Right label, wrong kind
        let token = Token::new("t".into(), GridPoint::new(0, 0), 1, TokenKind::Player, SerializableColor::red())
            .with_label("Goblin");
        assert_eq!(registry.icon_for(&token), IconHandle::GENERIC);

        let unlabeled = Token::new("u".into(), GridPoint::new(0, 0), 1, TokenKind::Npc, SerializableColor::red());
        assert_eq!(registry.icon_for(&unlabeled), IconHandle::GENERIC);
    }

    #[test]
    fn test_templates_are_unique() {
        let registry = IconRegistry::default();
        assert_eq!(registry.templates().len(), default_templates().len());
        assert_eq!(registry.template(TokenKind::Enemy, "Ogre").map(|t| t.size), Some(2));
    }
}
