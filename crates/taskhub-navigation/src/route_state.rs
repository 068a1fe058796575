//! Route classification for context resolution
//!
//! Maps a path (plus the router's entity parameter, if any) to the state the
//! resolver should enter.

use std::borrow::Cow;
use taskhub_access::EntityKind;

/// Normalize a route path
///
/// Strips query string and fragment, collapses the trailing slash and maps
/// the empty path to `/`.
#[must_use]
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let end = path.find(|c: char| c == '?' || c == '#').unwrap_or(path.len());
    let trimmed = path[..end].trim();
    let trimmed = trimmed.trim_end_matches('/');

    if trimmed.is_empty() {
        return Cow::Borrowed("/");
    }
    if trimmed.starts_with('/') {
        if trimmed.len() == path.len() {
            Cow::Borrowed(path)
        } else {
            Cow::Borrowed(trimmed)
        }
    } else {
        Cow::Owned(format!("/{trimmed}"))
    }
}

/// Path segments after normalization
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Resolver state selected by a path change
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteState {
    /// `/` or `/dashboard`
    Root,
    /// `/systems` without an id
    SystemList,
    /// `/systems/:id`
    SystemDetail(String),
    /// `/agencies` without an id
    AgencyList,
    /// `/agencies/:id`
    AgencyDetail(String),
    /// `/clients` without an id
    ClientList,
    /// `/clients/:id`
    ClientDetail(String),
    /// Any other path
    Other,
}

impl RouteState {
    /// Classify a path
    ///
    /// # Arguments
    /// * `path` - Current route path
    /// * `param` - Entity id supplied by the router for parameterized paths.
    ///   When absent, a two-segment path such as `/clients/C1` yields its
    ///   second segment.
    #[must_use]
    pub fn classify(path: &str, param: Option<&str>) -> Self {
        let path = normalize_path(path);
        if path == "/" || path == "/dashboard" {
            return Self::Root;
        }

        let parts: Vec<&str> = segments(&path).collect();
        let Some(kind) = parts.first().and_then(|head| collection_kind(head)) else {
            return Self::Other;
        };

        let id = param
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .or_else(|| (parts.len() == 2).then(|| parts[1]));

        match (kind, id) {
            (kind, Some(id)) => Self::detail(kind, id),
            (EntityKind::System, None) => Self::SystemList,
            (EntityKind::Agency, None) => Self::AgencyList,
            (EntityKind::Client, None) => Self::ClientList,
        }
    }

    /// Classify a path whose matched route names its entity
    ///
    /// The route's `(kind, id)` wins over the path's first segment, so nested
    /// routes such as `/agencies/:agency/clients/:id` resolve the client.
    /// Without a target this is [`RouteState::classify`].
    #[must_use]
    pub fn classify_target(path: &str, target: Option<(EntityKind, &str)>) -> Self {
        match target.map(|(kind, id)| (kind, id.trim())) {
            Some((kind, id)) if !id.is_empty() => Self::detail(kind, id),
            _ => Self::classify(path, None),
        }
    }

    /// Detail state for an entity
    #[must_use]
    pub fn detail(kind: EntityKind, id: &str) -> Self {
        match kind {
            EntityKind::System => Self::SystemDetail(id.to_string()),
            EntityKind::Agency => Self::AgencyDetail(id.to_string()),
            EntityKind::Client => Self::ClientDetail(id.to_string()),
        }
    }

    /// Short name used in logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::SystemList => "system_list",
            Self::SystemDetail(_) => "system_detail",
            Self::AgencyList => "agency_list",
            Self::AgencyDetail(_) => "agency_detail",
            Self::ClientList => "client_list",
            Self::ClientDetail(_) => "client_detail",
            Self::Other => "other",
        }
    }

    /// Entity to fetch, for detail states
    #[must_use]
    pub fn entity(&self) -> Option<(EntityKind, &str)> {
        match self {
            Self::SystemDetail(id) => Some((EntityKind::System, id.as_str())),
            Self::AgencyDetail(id) => Some((EntityKind::Agency, id.as_str())),
            Self::ClientDetail(id) => Some((EntityKind::Client, id.as_str())),
            _ => None,
        }
    }
}

/// Hierarchy level a collection segment lists
#[must_use]
pub fn collection_kind(segment: &str) -> Option<EntityKind> {
    match segment {
        "systems" => Some(EntityKind::System),
        "agencies" => Some(EntityKind::Agency),
        "clients" => Some(EntityKind::Client),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/tasks/"), "/tasks");
        assert_eq!(normalize_path("/tasks?page=2#top"), "/tasks");
        assert_eq!(normalize_path("clients/C1"), "/clients/C1");
        assert!(matches!(normalize_path("/sops"), Cow::Borrowed(_)));
    }

    #[test]
    fn root_paths() {
        assert_eq!(RouteState::classify("/", None), RouteState::Root);
        assert_eq!(RouteState::classify("/dashboard/", None), RouteState::Root);
    }

    #[test]
    fn lists_and_details() {
        assert_eq!(RouteState::classify("/systems", None), RouteState::SystemList);
        assert_eq!(
            RouteState::classify("/systems/S1", None),
            RouteState::SystemDetail("S1".into())
        );
        assert_eq!(
            RouteState::classify("/agencies/anything", Some("A7")),
            RouteState::AgencyDetail("A7".into())
        );
        assert_eq!(RouteState::classify("/clients", Some("  ")), RouteState::ClientList);
        assert_eq!(
            RouteState::classify("/clients/C1/tasks", None),
            RouteState::ClientList
        );
    }

    #[test]
    fn other_paths() {
        assert_eq!(RouteState::classify("/tasks", None), RouteState::Other);
        assert_eq!(RouteState::classify("/systemsx", None), RouteState::Other);
    }

    #[test]
    fn entity_for_detail() {
        let state = RouteState::classify("/clients/C9", None);
        assert_eq!(state.entity(), Some((EntityKind::Client, "C9")));
        assert_eq!(RouteState::Root.entity(), None);
    }

    #[test]
    fn target_kind_beats_first_segment() {
        assert_eq!(
            RouteState::classify_target(
                "/agencies/A1/clients/C1",
                Some((EntityKind::Client, "C1"))
            ),
            RouteState::ClientDetail("C1".into())
        );
        assert_eq!(
            RouteState::classify_target("/reports/S2", Some((EntityKind::System, " S2 "))),
            RouteState::SystemDetail("S2".into())
        );
        assert_eq!(
            RouteState::classify_target("/agencies", Some((EntityKind::Client, ""))),
            RouteState::AgencyList
        );
        assert_eq!(RouteState::classify_target("/tasks", None), RouteState::Other);
    }

    proptest! {
        #[test]
        fn normalized_paths_are_stable(path in "[a-z/?#=]{0,24}") {
            let once = normalize_path(&path).into_owned();
            let twice = normalize_path(&once).into_owned();
            prop_assert_eq!(&once, &twice);
            prop_assert!(once.starts_with('/'));
        }
    }
}
