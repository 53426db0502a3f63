use std::collections::HashMap;

use super::value_objects::SortableResource;

// ============================================================================
// Resource Registry
// ============================================================================
//
// Record types that may be reordered, keyed by the name used on the route.
// Built once at startup; capabilities are fixed at registration time.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Resource '{0}' is registered more than once")]
    DuplicateResource(String),

    #[error("No sortable resources configured")]
    Empty,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: HashMap<String, SortableResource>,
}

impl ResourceRegistry {
    pub fn new(resources: Vec<SortableResource>) -> Result<Self, RegistryError> {
        if resources.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut map = HashMap::with_capacity(resources.len());
        for resource in resources {
            if map.contains_key(&resource.name) {
                return Err(RegistryError::DuplicateResource(resource.name));
            }
            map.insert(resource.name.clone(), resource);
        }

        Ok(Self { resources: map })
    }

    pub fn get(&self, name: &str) -> Option<&SortableResource> {
        self.resources.get(name)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ordering::OrderingScope;

    fn resource(name: &str) -> SortableResource {
        SortableResource {
            name: name.to_string(),
            model: name.to_string(),
            scope: OrderingScope::new(name, "id", "sort_order", None).unwrap(),
            step_moves: true,
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let registry = ResourceRegistry::new(vec![resource("articles"), resource("pages")]).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("pages").unwrap().scope.table(), "pages");
        assert!(registry.get("users").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = ResourceRegistry::new(vec![resource("articles"), resource("articles")]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateResource(name) if name == "articles"));
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert!(matches!(ResourceRegistry::new(vec![]), Err(RegistryError::Empty)));
    }
}
