//! Prompt template registry
//!
//! This module provides [`PromptRegistry`], a thread-safe registry for storing
//! and rendering prompt templates by name.

use crate::{PromptError, PromptTemplate, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A thread-safe registry of prompt templates
///
/// # Examples
///
/// ```
/// use research_prompt::{PromptRegistry, PromptTemplate};
/// use serde_json::json;
///
/// let registry = PromptRegistry::new();
/// registry.register(
///     PromptTemplate::new("research.basic.research", ["ticker"], "Research {{ ticker }}").unwrap(),
/// );
///
/// let prompt = registry
///     .render("research.basic.research", &json!({ "ticker": "TSLA" }))
///     .unwrap();
/// assert_eq!(prompt, "Research TSLA");
/// ```
#[derive(Default)]
pub struct PromptRegistry {
    templates: RwLock<HashMap<String, Arc<PromptTemplate>>>,
}

impl PromptRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template
    ///
    /// If a template with the same name already exists, it will be replaced.
    pub fn register(&self, template: PromptTemplate) {
        if let Ok(mut templates) = self.templates.write() {
            templates.insert(template.name().to_string(), Arc::new(template));
        }
    }

    /// Register multiple templates at once
    pub fn register_all(&self, templates: impl IntoIterator<Item = PromptTemplate>) {
        for template in templates {
            self.register(template);
        }
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Option<Arc<PromptTemplate>> {
        self.templates.read().ok()?.get(name).cloned()
    }

    /// Get a template by name or fail with `TemplateNotRegistered`
    pub fn require(&self, name: &str) -> Result<Arc<PromptTemplate>> {
        self.get(name)
            .ok_or_else(|| PromptError::TemplateNotRegistered(name.to_string()))
    }

    /// Check if a template is registered
    pub fn contains(&self, name: &str) -> bool {
        self.templates
            .read()
            .map(|t| t.contains_key(name))
            .unwrap_or(false)
    }

    /// Render a registered template
    pub fn render(&self, name: &str, vars: &serde_json::Value) -> Result<String> {
        self.require(name)?.render(vars)
    }

    /// List all registered template names, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .templates
            .read()
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Get the number of registered templates
    pub fn len(&self) -> usize {
        self.templates.read().map(|t| t.len()).unwrap_or(0)
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRegistry")
            .field("templates", &self.list())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;

    fn template(name: &str, text: &str) -> PromptTemplate {
        PromptTemplate::new(name, ["ticker"], text).unwrap()
    }

    #[test]
    fn test_register_and_render() {
        let registry = PromptRegistry::new();
        assert!(registry.is_empty());

        registry.register(template("research.basic.research", "Research {{ ticker }}"));
        assert!(registry.contains("research.basic.research"));
        assert_eq!(registry.len(), 1);

        let prompt = registry
            .render("research.basic.research", &json!({ "ticker": "TSLA" }))
            .unwrap();
        assert_eq!(prompt, "Research TSLA");
    }

    #[test]
    fn test_unknown_template() {
        let registry = PromptRegistry::new();
        let result = registry.render("nope", &json!({}));
        assert!(matches!(result, Err(PromptError::TemplateNotRegistered(ref n)) if n == "nope"));
    }

    #[test]
    fn test_register_replaces() {
        let registry = PromptRegistry::new();
        registry.register(template("a", "first {{ ticker }}"));
        registry.register(template("a", "second {{ ticker }}"));

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.render("a", &json!({ "ticker": "X" })).unwrap(),
            "second X"
        );
    }

    #[test]
    fn test_list_sorted() {
        let registry = PromptRegistry::new();
        registry.register_all([template("b", "{{ ticker }}"), template("a", "{{ ticker }}")]);
        assert_eq!(registry.list(), vec!["a", "b"]);
    }

    #[test]
    fn test_concurrent_access() {
        let registry = Arc::new(PromptRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry.register(template(&format!("prompt.{i}"), "{{ ticker }}"));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8);
    }
}
