//! Workflow configuration loading and management
//!
//! Each collection may override its page size and its transition table. A
//! collection without an entry (or with an empty `transitions` map) keeps
//! the default table of its domain.
//!
//! ```yaml
//! pagination:
//!   default_page_size: 10
//!   max_page_size: 100
//!
//! collections:
//!   - resource: orders
//!     page_size: 25
//!     transitions:
//!       pending: [confirmed, cancelled]
//!       confirmed: [processing, cancelled]
//!       processing: [shipped, cancelled]
//! ```

use crate::core::error::ConfigError;
use crate::core::status::Status;
use crate::core::transition::{TransitionTable, Workflow};
use crate::records::{Intake, Order, Patient, Product, Subscription, SubscriptionPlan};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use validator::Validate;

/// Page size limits shared by all collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PaginationConfig {
    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_page_size() -> usize {
    10
}

fn default_max_page_size() -> usize {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Per-collection overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CollectionConfig {
    /// Plural resource name (e.g., "orders", "subscription-plans")
    pub resource: String,

    #[validate(range(min = 1, max = 1000))]
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Status -> statuses reachable in one step
    #[serde(default)]
    pub transitions: HashMap<String, Vec<String>>,
}

/// Complete workflow configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
pub struct WorkflowConfig {
    #[validate(nested)]
    #[serde(default)]
    pub pagination: PaginationConfig,

    #[validate(nested)]
    #[serde(default)]
    pub collections: Vec<CollectionConfig>,
}

impl WorkflowConfig {
    /// Configuration spelling out the built-in table of every domain
    ///
    /// Handy as a starting point for a YAML override file.
    pub fn default_config() -> Self {
        fn entry<R: Workflow>() -> CollectionConfig {
            CollectionConfig {
                resource: R::resource_name().to_string(),
                page_size: None,
                transitions: R::default_transitions().to_config(),
            }
        }

        Self {
            pagination: PaginationConfig::default(),
            collections: vec![
                entry::<Order>(),
                entry::<Product>(),
                entry::<Subscription>(),
                entry::<SubscriptionPlan>(),
                entry::<Intake>(),
                entry::<Patient>(),
            ],
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Validate numeric limits and their consistency
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.pagination.default_page_size > self.pagination.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "default_page_size ({}) exceeds max_page_size ({})",
                self.pagination.default_page_size, self.pagination.max_page_size
            )));
        }
        Ok(())
    }

    /// Merge several configurations.
    ///
    /// Later configurations win: pagination is taken from the last config
    /// that was given, and a collection entry replaces any earlier entry
    /// for the same resource.
    pub fn merge(configs: Vec<WorkflowConfig>) -> Self {
        let mut merged = WorkflowConfig::default();
        for config in configs {
            merged.pagination = config.pagination;
            for collection in config.collections {
                match merged
                    .collections
                    .iter_mut()
                    .find(|c| c.resource == collection.resource)
                {
                    Some(existing) => *existing = collection,
                    None => merged.collections.push(collection),
                }
            }
        }
        merged
    }

    pub fn collection(&self, resource: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.resource == resource)
    }

    /// Page size for `resource`, capped at `max_page_size`
    pub fn page_size_for(&self, resource: &str) -> usize {
        self.collection(resource)
            .and_then(|c| c.page_size)
            .unwrap_or(self.pagination.default_page_size)
            .clamp(1, self.pagination.max_page_size.max(1))
    }

    /// Transition table for `R`: the configured override or its default
    ///
    /// Either way, the domain's terminal statuses must stay terminal.
    pub fn transitions_for<R: Workflow>(&self) -> Result<TransitionTable<R::Status>, ConfigError> {
        let resource = R::resource_name();
        let table = match self.collection(resource) {
            Some(c) if !c.transitions.is_empty() => {
                let table = TransitionTable::from_config(resource, &c.transitions)?;
                tracing::debug!(
                    resource,
                    statuses = R::Status::all().len(),
                    "using configured transition table"
                );
                table
            }
            _ => R::default_transitions(),
        };
        table.ensure_terminal(resource, R::terminal_statuses())?;
        Ok(table)
    }

    /// Fail on the first collection entry whose resource is not in `registered`
    pub fn check_resources(&self, registered: &[&str]) -> Result<(), ConfigError> {
        match self
            .collections
            .iter()
            .find(|c| !registered.contains(&c.resource.as_str()))
        {
            Some(c) => Err(ConfigError::UnknownCollection {
                resource: c.resource.clone(),
            }),
            None => Ok(()),
        }
    }
}
