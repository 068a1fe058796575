//! Navigation context
//!
//! The system/agency/client the UI is currently operating within, as opposed
//! to the user's home scope.

use serde::{Deserialize, Serialize};
use taskhub_access::EntityKind;

/// Id and display name of a hierarchy entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityLabel {
    /// Entity id
    pub id: String,
    /// Display name
    pub name: String,
}

impl EntityLabel {
    /// Create label
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Active system/agency/client
///
/// When a level is set its ancestors are populated too whenever the lookup
/// service could resolve them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationContext {
    /// Active system
    pub current_system: Option<EntityLabel>,
    /// Active agency
    pub current_agency: Option<EntityLabel>,
    /// Active client
    pub current_client: Option<EntityLabel>,
}

impl NavigationContext {
    /// Empty context
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether no level is set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current_system.is_none()
            && self.current_agency.is_none()
            && self.current_client.is_none()
    }

    /// Entity at one level
    #[inline]
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> Option<&EntityLabel> {
        match kind {
            EntityKind::System => self.current_system.as_ref(),
            EntityKind::Agency => self.current_agency.as_ref(),
            EntityKind::Client => self.current_client.as_ref(),
        }
    }

    /// Deepest level that is set
    #[must_use]
    pub fn most_specific(&self) -> Option<(EntityKind, &EntityLabel)> {
        EntityKind::ALL
            .into_iter()
            .rev()
            .find_map(|kind| self.get(kind).map(|label| (kind, label)))
    }

    /// Set levels, root first
    pub fn levels(&self) -> impl Iterator<Item = (EntityKind, &EntityLabel)> + '_ {
        EntityKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|label| (kind, label)))
    }

    /// Clear every level
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Clear every level strictly below `kind`
    pub fn clear_below(&mut self, kind: EntityKind) {
        if kind < EntityKind::Agency {
            self.current_agency = None;
        }
        if kind < EntityKind::Client {
            self.current_client = None;
        }
    }
}
