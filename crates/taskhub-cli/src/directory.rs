//! Static entity directory read from a JSON file
//!
//! ```json
//! {
//!   "systems":  [{ "id": "S1", "name": "North" }],
//!   "agencies": [{ "id": "A1", "name": "Acme", "system": "S1" }],
//!   "clients":  [{ "id": "C1", "name": "Globex", "agency": "A1" }]
//! }
//! ```

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use taskhub_access::EntityKind;
use taskhub_navigation::{
    AgencyRecord, ClientRecord, EntityLabel, EntityLookup, LookupError, SystemRecord,
};

#[derive(Debug, Deserialize)]
struct Entry {
    id: String,
    name: String,
    #[serde(default, alias = "system", alias = "agency")]
    parent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DirectoryFile {
    systems: Vec<Entry>,
    agencies: Vec<Entry>,
    clients: Vec<Entry>,
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<String>,
}

/// Read-only directory loaded once at startup
#[derive(Debug, Default)]
pub(crate) struct StaticDirectory {
    systems: HashMap<String, Node>,
    agencies: HashMap<String, Node>,
    clients: HashMap<String, Node>,
}

impl StaticDirectory {
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading directory {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing directory {}", path.display()))
    }

    pub(crate) fn from_json(text: &str) -> anyhow::Result<Self> {
        let file: DirectoryFile = serde_json::from_str(text)?;
        let index = |entries: Vec<Entry>| {
            entries
                .into_iter()
                .map(|e| {
                    (
                        e.id,
                        Node {
                            name: e.name,
                            parent: e.parent,
                        },
                    )
                })
                .collect::<HashMap<_, _>>()
        };
        Ok(Self {
            systems: index(file.systems),
            agencies: index(file.agencies),
            clients: index(file.clients),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.systems.len() + self.agencies.len() + self.clients.len()
    }

    fn label(map: &HashMap<String, Node>, id: &str) -> Option<EntityLabel> {
        map.get(id).map(|node| EntityLabel::new(id, &node.name))
    }
}

#[async_trait]
impl EntityLookup for StaticDirectory {
    async fn get_system(&self, id: &str) -> Result<SystemRecord, LookupError> {
        let node = self
            .systems
            .get(id)
            .ok_or_else(|| LookupError::not_found(EntityKind::System, id))?;
        Ok(SystemRecord {
            id: id.to_string(),
            name: node.name.clone(),
        })
    }

    async fn get_agency(&self, id: &str) -> Result<AgencyRecord, LookupError> {
        let node = self
            .agencies
            .get(id)
            .ok_or_else(|| LookupError::not_found(EntityKind::Agency, id))?;
        Ok(AgencyRecord {
            id: id.to_string(),
            name: node.name.clone(),
            system: node
                .parent
                .as_deref()
                .and_then(|s| Self::label(&self.systems, s)),
        })
    }

    async fn get_client(&self, id: &str) -> Result<ClientRecord, LookupError> {
        let node = self
            .clients
            .get(id)
            .ok_or_else(|| LookupError::not_found(EntityKind::Client, id))?;
        let agency_id = node.parent.as_deref();
        let system_id = agency_id
            .and_then(|a| self.agencies.get(a))
            .and_then(|agency| agency.parent.as_deref());

        Ok(ClientRecord {
            id: id.to_string(),
            name: node.name.clone(),
            agency: agency_id.and_then(|a| Self::label(&self.agencies, a)),
            system: system_id.and_then(|s| Self::label(&self.systems, s)),
        })
    }
}
