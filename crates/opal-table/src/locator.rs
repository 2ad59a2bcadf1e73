//! Table registry.
//!
//! Maps table names to lazily-constructed, connection-bound [`Table`]
//! instances, one per name for the lifetime of the locator.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use opal_query::ConnectionLocator;

use crate::error::{Result, TableError};
use crate::events::DefaultEvents;
use crate::schema::TableSchema;
use crate::table::Table;

type TableFactory = Box<dyn Fn(&ConnectionLocator) -> Table + Send + Sync>;

/// Lazily constructs and caches one [`Table`] per registered name.
pub struct TableLocator {
    connections: ConnectionLocator,
    factories: HashMap<String, TableFactory>,
    instances: Mutex<HashMap<String, Arc<Table>>>,
}

impl TableLocator {
    /// Creates an empty locator over the given connection pair.
    #[must_use]
    pub fn new(connections: ConnectionLocator) -> Self {
        Self {
            connections,
            factories: HashMap::new(),
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a table factory under a name.
    pub fn register(
        &mut self,
        name: &str,
        factory: impl Fn(&ConnectionLocator) -> Table + Send + Sync + 'static,
    ) {
        self.factories.insert(String::from(name), Box::new(factory));
    }

    /// Registers a schema descriptor under its own table name, with the
    /// default (no-op) events.
    pub fn register_schema(&mut self, schema: TableSchema) {
        let name = schema.name.clone();
        self.register(&name, move |connections| {
            Table::new(schema.clone(), connections.clone(), Arc::new(DefaultEvents))
        });
    }

    /// Whether a factory is registered under the name.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns the table registered under the name, constructing it on
    /// first use. Unknown names fail with
    /// [`TableError::TableNotRegistered`].
    pub fn get(&self, name: &str) -> Result<Arc<Table>> {
        let mut instances = self
            .instances
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(table) = instances.get(name) {
            return Ok(Arc::clone(table));
        }
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| TableError::TableNotRegistered {
                name: String::from(name),
            })?;
        let table = Arc::new(factory(&self.connections));
        instances.insert(String::from(name), Arc::clone(&table));
        Ok(table)
    }
}
