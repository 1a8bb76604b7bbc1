//! Definition registry
//!
//! Static content keyed by domain and id. Filled once at startup and read
//! by every generator after that; registering an existing id replaces the
//! entry wholesale, which is how hot reload works.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::items::{ItemDefinition, LootTable, ModifierTable};

/// Registry shared with a hot-reloading host
pub type SharedRegistry = Arc<RwLock<DefinitionRegistry>>;

/// Content domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Item,
    LootTable,
    ModifierTable,
}

impl Domain {
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Item => "item",
            Domain::LootTable => "loot table",
            Domain::ModifierTable => "modifier table",
        }
    }
}

/// Owned content ready for registration
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Item(ItemDefinition),
    LootTable(LootTable),
    ModifierTable(ModifierTable),
}

impl Content {
    pub fn domain(&self) -> Domain {
        match self {
            Content::Item(_) => Domain::Item,
            Content::LootTable(_) => Domain::LootTable,
            Content::ModifierTable(_) => Domain::ModifierTable,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Content::Item(def) => &def.id,
            Content::LootTable(table) => &table.id,
            Content::ModifierTable(table) => &table.id,
        }
    }
}

impl From<ItemDefinition> for Content {
    fn from(def: ItemDefinition) -> Self {
        Content::Item(def)
    }
}

impl From<LootTable> for Content {
    fn from(table: LootTable) -> Self {
        Content::LootTable(table)
    }
}

impl From<ModifierTable> for Content {
    fn from(table: ModifierTable) -> Self {
        Content::ModifierTable(table)
    }
}

/// Borrowed content returned from a lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentRef<'a> {
    Item(&'a ItemDefinition),
    LootTable(&'a LootTable),
    ModifierTable(&'a ModifierTable),
}

/// All static definitions
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    items: HashMap<String, ItemDefinition>,
    loot_tables: HashMap<String, LootTable>,
    modifier_tables: HashMap<String, ModifierTable>,
}

impl DefinitionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in catalog
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.extend(super::catalog::default_content());
        registry
    }

    /// Wrap for sharing with a host that reloads content at runtime
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Insert or replace content. The domain and id come from the content itself.
    pub fn register(&mut self, content: impl Into<Content>) {
        let content = content.into();
        let domain = content.domain();
        let id = content.id().to_string();

        let replaced = match content {
            Content::Item(def) => self.items.insert(id.clone(), def).is_some(),
            Content::LootTable(table) => self.loot_tables.insert(id.clone(), table).is_some(),
            Content::ModifierTable(table) => self.modifier_tables.insert(id.clone(), table).is_some(),
        };

        if replaced {
            log::debug!("Replaced {} '{}'", domain.name(), id);
        }
    }

    /// Hot reload: replace one item definition wholesale.
    /// Instances already generated keep their snapshot of the old stats.
    pub fn reload_item(&mut self, definition: ItemDefinition) {
        log::info!("Reloading item '{}'", definition.id);
        self.register(definition);
    }

    /// Register many entries at once
    pub fn extend(&mut self, contents: impl IntoIterator<Item = Content>) {
        for content in contents {
            self.register(content);
        }
    }

    /// Look up content. Missing content is logged, never fatal.
    pub fn query(&self, domain: Domain, id: &str) -> Option<ContentRef<'_>> {
        let found = match domain {
            Domain::Item => self.items.get(id).map(ContentRef::Item),
            Domain::LootTable => self.loot_tables.get(id).map(ContentRef::LootTable),
            Domain::ModifierTable => self.modifier_tables.get(id).map(ContentRef::ModifierTable),
        };
        if found.is_none() {
            log::warn!("Undefined {} '{}'", domain.name(), id);
        }
        found
    }

    pub fn item(&self, id: &str) -> Option<&ItemDefinition> {
        match self.query(Domain::Item, id)? {
            ContentRef::Item(def) => Some(def),
            _ => None,
        }
    }

    pub fn loot_table(&self, id: &str) -> Option<&LootTable> {
        match self.query(Domain::LootTable, id)? {
            ContentRef::LootTable(table) => Some(table),
            _ => None,
        }
    }

    pub fn modifier_table(&self, id: &str) -> Option<&ModifierTable> {
        match self.query(Domain::ModifierTable, id)? {
            ContentRef::ModifierTable(table) => Some(table),
            _ => None,
        }
    }

    /// Check for content without logging a miss
    pub fn contains(&self, domain: Domain, id: &str) -> bool {
        match domain {
            Domain::Item => self.items.contains_key(id),
            Domain::LootTable => self.loot_tables.contains_key(id),
            Domain::ModifierTable => self.modifier_tables.contains_key(id),
        }
    }

    /// Number of entries in a domain
    pub fn len(&self, domain: Domain) -> usize {
        match domain {
            Domain::Item => self.items.len(),
            Domain::LootTable => self.loot_tables.len(),
            Domain::ModifierTable => self.modifier_tables.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.loot_tables.is_empty() && self.modifier_tables.is_empty()
    }

    /// IDs of all loot tables, sorted
    pub fn loot_table_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.loot_tables.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over item definitions
    pub fn items(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    /// Iterate over loot tables
    pub fn loot_tables(&self) -> impl Iterator<Item = &LootTable> {
        self.loot_tables.values()
    }

    /// Iterate over modifier tables
    pub fn modifier_tables(&self) -> impl Iterator<Item = &ModifierTable> {
        self.modifier_tables.values()
    }
}
