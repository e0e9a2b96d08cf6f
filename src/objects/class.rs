//! Config class hierarchy with single inheritance

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root of every config class chain
pub const ROOT_CLASS: &str = "all";

/// Config class that marks static map content (buildings, wrecks, wells, ...)
pub const HOUSE_CLASS: &str = "house";

/// A config class definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Class name, stored lowercase
    pub name: String,
    /// Parent class name (None for the root class)
    pub parent: Option<String>,
}

impl ClassDef {
    /// Create a new class definition
    pub fn new(name: &str, parent: Option<&str>) -> Self {
        Self {
            name: name.to_lowercase(),
            parent: parent.map(|s| s.to_lowercase()),
        }
    }
}

/// Registry of config class definitions
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassDef>,
}

impl ClassRegistry {
    /// Create a new registry with the base classes
    pub fn new() -> Self {
        let mut registry = Self {
            classes: HashMap::new(),
        };
        registry.register_base_classes();
        registry
    }

    fn register_base_classes(&mut self) {
        self.register(ClassDef::new(ROOT_CLASS, None));

        // static map content
        self.register(ClassDef::new(HOUSE_CLASS, Some(ROOT_CLASS)));
        for name in ["building", "wreck", "well", "ruin"] {
            self.register(ClassDef::new(name, Some(HOUSE_CLASS)));
        }

        // dynamic content
        for name in ["inventory_base", "man", "car", "animal"] {
            self.register(ClassDef::new(name, Some(ROOT_CLASS)));
        }
    }

    /// Register a class definition, replacing any previous one with that name
    pub fn register(&mut self, class: ClassDef) {
        self.classes.insert(class.name.clone(), class);
    }

    /// Get a class definition by name
    pub fn get(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(&name.to_lowercase())
    }

    /// Check if a class exists
    pub fn exists(&self, name: &str) -> bool {
        self.classes.contains_key(&name.to_lowercase())
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True when no classes are registered
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Get the inheritance chain for a class (child -> ... -> root)
    ///
    /// Stops at the first unknown name and on cycles, so a malformed
    /// hierarchy yields a truncated chain instead of looping.
    pub fn get_chain(&self, name: &str) -> Vec<String> {
        let mut chain: Vec<String> = Vec::new();
        let mut current = name.to_lowercase();

        while let Some(class) = self.classes.get(&current) {
            if chain.contains(&class.name) {
                break;
            }
            chain.push(class.name.clone());
            match &class.parent {
                Some(parent) => current = parent.clone(),
                None => break,
            }
        }

        chain
    }

    /// Check if a class is a descendant of (or equal to) another class
    pub fn is_a(&self, child: &str, ancestor: &str) -> bool {
        let ancestor = ancestor.to_lowercase();
        self.get_chain(child).contains(&ancestor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names_are_lowercased() {
        let class = ClassDef::new("Land_Barn", Some("Building"));
        assert_eq!(class.name, "land_barn");
        assert_eq!(class.parent, Some("building".to_string()));
    }

    #[test]
    fn test_registry_base_classes() {
        let registry = ClassRegistry::new();

        assert!(registry.exists("all"));
        assert!(registry.exists("house"));
        assert!(registry.exists("building"));
        assert!(registry.exists("wreck"));
        assert!(registry.exists("inventory_base"));
        assert!(registry.exists("Man"));
        assert!(!registry.exists("land_barn"));
    }

    #[test]
    fn test_inheritance_chain() {
        let mut registry = ClassRegistry::new();
        registry.register(ClassDef::new("Land_Barn", Some("building")));

        assert_eq!(
            registry.get_chain("land_barn"),
            vec!["land_barn", "building", "house", "all"]
        );
        assert_eq!(registry.get_chain("car"), vec!["car", "all"]);
        assert!(registry.get_chain("unknown").is_empty());
    }

    #[test]
    fn test_is_a() {
        let mut registry = ClassRegistry::new();
        registry.register(ClassDef::new("Land_Wreck_Volha", Some("wreck")));
        registry.register(ClassDef::new("Hatchback_02", Some("car")));

        assert!(registry.is_a("land_wreck_volha", "house"));
        assert!(registry.is_a("LAND_WRECK_VOLHA", "House"));
        assert!(registry.is_a("house", "house"));
        assert!(!registry.is_a("hatchback_02", "house"));
        assert!(!registry.is_a("", "house"));
    }

    #[test]
    fn test_cycle_terminates() {
        let mut registry = ClassRegistry::new();
        registry.register(ClassDef::new("a", Some("b")));
        registry.register(ClassDef::new("b", Some("a")));

        assert_eq!(registry.get_chain("a"), vec!["a", "b"]);
        assert!(!registry.is_a("a", "house"));
    }
}
