//! Turn-order entries.

use super::{EntityId, TokenKind};
use serde::{Deserialize, Serialize};

/// A combatant in the initiative order, optionally linked to a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: EntityId,
    pub name: String,
    pub initiative: i32,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<EntityId>,
}

impl Participant {
    pub fn new(id: EntityId, name: impl Into<String>, initiative: i32, kind: TokenKind) -> Self {
        Self {
            id,
            name: name.into(),
            initiative,
            kind,
            hp: None,
            ac: None,
            token_id: None,
        }
    }
}

/// Sort into turn order: highest initiative first, ties by name.
pub fn sort_turn_order(participants: &mut [Participant]) {
    participants.sort_by(|a, b| {
        b.initiative
            .cmp(&a.initiative)
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_order() {
        let mut list = vec![
            Participant::new("a".into(), "Orc", 8, TokenKind::Enemy),
            Participant::new("b".into(), "Aria", 15, TokenKind::Player),
            Participant::new("c".into(), "Bram", 15, TokenKind::Player),
        ];
        sort_turn_order(&mut list);
        let names: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Aria", "Bram", "Orc"]);
    }
}
