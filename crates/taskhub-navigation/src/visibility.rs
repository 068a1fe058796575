//! Tag and SOP visibility within the navigation context
//!
//! Tags and SOPs are owned by one level of the hierarchy (or by nobody, in
//! which case they are global). An item is visible when its owner is the
//! active entity at that level, which makes system items visible throughout
//! the system, agency items within the agency and its clients, and client
//! items only inside that client.

use crate::context::NavigationContext;
use serde::{Deserialize, Serialize};
use taskhub_access::EntityKind;

/// Owner of a scoped item
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemScope {
    /// Owning system
    pub system_id: Option<String>,
    /// Owning agency
    pub agency_id: Option<String>,
    /// Owning client
    pub client_id: Option<String>,
}

impl ItemScope {
    /// Visible everywhere
    #[inline]
    #[must_use]
    pub fn global() -> Self {
        Self::default()
    }

    /// Owned by a system
    #[inline]
    #[must_use]
    pub fn system(id: impl Into<String>) -> Self {
        Self {
            system_id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Owned by an agency
    #[inline]
    #[must_use]
    pub fn agency(id: impl Into<String>) -> Self {
        Self {
            agency_id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Owned by a client
    #[inline]
    #[must_use]
    pub fn client(id: impl Into<String>) -> Self {
        Self {
            client_id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Deepest owning level
    #[must_use]
    pub fn owner(&self) -> Option<(EntityKind, &str)> {
        self.client_id
            .as_deref()
            .map(|id| (EntityKind::Client, id))
            .or_else(|| self.agency_id.as_deref().map(|id| (EntityKind::Agency, id)))
            .or_else(|| self.system_id.as_deref().map(|id| (EntityKind::System, id)))
    }

    /// Whether an item with this scope is visible in `ctx`
    #[must_use]
    pub fn is_visible_in(&self, ctx: &NavigationContext) -> bool {
        match self.owner() {
            None => true,
            Some((kind, id)) => ctx.get(kind).is_some_and(|active| active.id == id),
        }
    }
}

/// Anything carrying an [`ItemScope`]
pub trait Scoped {
    /// Owner of the item
    fn scope(&self) -> &ItemScope;
}

/// Generic scoped wrapper for tags, SOPs and similar items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedItem<T> {
    /// Wrapped item
    pub item: T,
    /// Owner
    pub scope: ItemScope,
}

impl<T> ScopedItem<T> {
    /// Wrap an item
    #[inline]
    #[must_use]
    pub fn new(item: T, scope: ItemScope) -> Self {
        Self { item, scope }
    }
}

impl<T> Scoped for ScopedItem<T> {
    fn scope(&self) -> &ItemScope {
        &self.scope
    }
}

/// Items visible in the given context, in input order
pub fn visible_in<'a, T: Scoped>(ctx: &NavigationContext, items: &'a [T]) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| item.scope().is_visible_in(ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EntityLabel;

    fn ctx(system: Option<&str>, agency: Option<&str>, client: Option<&str>) -> NavigationContext {
        NavigationContext {
            current_system: system.map(|id| EntityLabel::new(id, id)),
            current_agency: agency.map(|id| EntityLabel::new(id, id)),
            current_client: client.map(|id| EntityLabel::new(id, id)),
        }
    }

    fn sops() -> Vec<ScopedItem<&'static str>> {
        vec![
            ScopedItem::new("global", ItemScope::global()),
            ScopedItem::new("system", ItemScope::system("S1")),
            ScopedItem::new("agency", ItemScope::agency("A1")),
            ScopedItem::new("other-agency", ItemScope::agency("A2")),
            ScopedItem::new("client", ItemScope::client("C1")),
        ]
    }

    fn names(ctx: &NavigationContext) -> Vec<&'static str> {
        let items = sops();
        visible_in(ctx, &items).into_iter().map(|i| i.item).collect()
    }

    #[test]
    fn empty_context_shows_globals_only() {
        assert_eq!(names(&ctx(None, None, None)), vec!["global"]);
    }

    #[test]
    fn agency_context_shows_ancestors() {
        assert_eq!(
            names(&ctx(Some("S1"), Some("A1"), None)),
            vec!["global", "system", "agency"]
        );
    }

    #[test]
    fn client_context_shows_whole_chain() {
        assert_eq!(
            names(&ctx(Some("S1"), Some("A1"), Some("C1"))),
            vec!["global", "system", "agency", "client"]
        );
    }

    #[test]
    fn owner_is_deepest_level() {
        let scope = ItemScope {
            system_id: Some("S1".into()),
            agency_id: Some("A1".into()),
            client_id: None,
        };
        assert_eq!(scope.owner(), Some((EntityKind::Agency, "A1")));
    }
}
