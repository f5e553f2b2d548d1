//! Owned list documents (grocery and pantry).
//!
//! Both list types share one shape: a singleton document per `(owner, kind)`
//! holding an ordered sequence of items. Item identifiers are minted
//! server-side on append; a full replace preserves client-supplied ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{Error, UserId};

/// Which singleton list a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Grocery,
    Pantry,
}

impl ListKind {
    /// Canonical storage string for the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grocery => "grocery",
            Self::Pantry => "pantry",
        }
    }

    /// Parse the canonical storage string.
    pub fn from_storage(raw: &str) -> Option<Self> {
        match raw {
            "grocery" => Some(Self::Grocery),
            "pantry" => Some(Self::Pantry),
            _ => None,
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single entry in an owned list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Locally-unique identifier minted when the item was added.
    pub id: Uuid,
    pub name: String,
    /// Always at least 1; absent or zero input quantities default to 1.
    pub quantity: u32,
}

/// Unvalidated item input from a client.
#[derive(Debug, Clone, Default)]
pub struct ListItemDraft {
    /// Client-supplied identifier, honoured only on full replace.
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub quantity: Option<u32>,
}

impl ListItemDraft {
    /// Validate into a new item with a freshly minted identifier.
    pub fn into_new_item(self) -> Result<ListItem, Error> {
        let Self { name, quantity, .. } = self;
        Ok(ListItem {
            id: Uuid::new_v4(),
            name: validate_item_name(name)?,
            quantity: default_quantity(quantity),
        })
    }

    /// Validate into a replacement item, preserving a client-supplied id.
    pub fn into_replacement_item(self) -> Result<ListItem, Error> {
        let Self { id, name, quantity } = self;
        Ok(ListItem {
            id: id.unwrap_or_else(Uuid::new_v4),
            name: validate_item_name(name)?,
            quantity: default_quantity(quantity),
        })
    }
}

fn validate_item_name(name: Option<String>) -> Result<String, Error> {
    let name = name.unwrap_or_default();
    if name.trim().is_empty() {
        return Err(Error::invalid_request("item name must not be empty")
            .with_details(json!({"field": "name"})));
    }
    Ok(name)
}

/// Absent or zero quantities default to 1.
const fn default_quantity(quantity: Option<u32>) -> u32 {
    match quantity {
        None | Some(0) => 1,
        Some(q) => q,
    }
}

/// Singleton list document owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedList {
    pub owner_id: UserId,
    pub kind: ListKind,
    pub items: Vec<ListItem>,
}

impl OwnedList {
    /// Empty list for first access.
    pub const fn empty(owner_id: UserId, kind: ListKind) -> Self {
        Self {
            owner_id,
            kind,
            items: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn draft(name: &str, quantity: Option<u32>) -> ListItemDraft {
        ListItemDraft {
            id: None,
            name: Some(name.into()),
            quantity,
        }
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some(0), 1)]
    #[case(Some(1), 1)]
    #[case(Some(7), 7)]
    fn quantity_defaults_to_one(#[case] quantity: Option<u32>, #[case] expected: u32) {
        let item = draft("Flour", quantity).into_new_item().expect("valid item");
        assert_eq!(item.quantity, expected);
    }

    #[rstest]
    fn new_items_get_fresh_ids() {
        let a = draft("Milk", None).into_new_item().expect("valid item");
        let b = draft("Milk", None).into_new_item().expect("valid item");
        assert_ne!(a.id, b.id);
    }

    #[rstest]
    fn replacement_preserves_client_supplied_id() {
        let id = Uuid::new_v4();
        let item = ListItemDraft {
            id: Some(id),
            name: Some("Eggs".into()),
            quantity: Some(12),
        }
        .into_replacement_item()
        .expect("valid item");
        assert_eq!(item.id, id);
    }

    #[rstest]
    fn replacement_mints_id_when_absent() {
        let item = draft("Eggs", None)
            .into_replacement_item()
            .expect("valid item");
        assert_ne!(item.id, Uuid::nil());
    }

    #[rstest]
    #[case(None)]
    #[case(Some("".into()))]
    #[case(Some("   ".into()))]
    fn blank_names_are_rejected(#[case] name: Option<String>) {
        let err = ListItemDraft {
            id: None,
            name,
            quantity: None,
        }
        .into_new_item()
        .expect_err("should be rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(ListKind::Grocery, "grocery")]
    #[case(ListKind::Pantry, "pantry")]
    fn kind_storage_form_round_trips(#[case] kind: ListKind, #[case] raw: &str) {
        assert_eq!(kind.as_str(), raw);
        assert_eq!(ListKind::from_storage(raw), Some(kind));
    }
}
