//! Runtime-toggleable extensions.
//!
//! An extension is the set of commands sharing a Poise category. Unloading it
//! does not remove the commands from the framework; the command check refuses
//! them until the extension is loaded again.

use crate::framework::{Data, Error};
use dashmap::DashMap;
use std::collections::HashSet;
use thiserror::Error;
use tracing::info;

/// Extension management errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    /// No extension with that name is registered
    #[error("No extension named '{0}'")]
    Unknown(String),

    /// The extension is already loaded
    #[error("Extension '{0}' is already loaded")]
    AlreadyLoaded(String),

    /// The extension is not loaded
    #[error("Extension '{0}' is not loaded")]
    NotLoaded(String),

    /// The extension may never be unloaded
    #[error("Extension '{0}' cannot be unloaded")]
    Protected(String),
}

/// Tracks which extensions are loaded.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    loaded: DashMap<String, bool>,
    protected: HashSet<String>,
}

impl ExtensionRegistry {
    /// Registers `names`, all loaded. Names in `protected` can never be unloaded.
    pub fn new<I, P>(names: I, protected: P) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self {
            loaded: names
                .into_iter()
                .map(|name| (normalize(name.as_ref()), true))
                .collect(),
            protected: protected
                .into_iter()
                .map(|name| normalize(name.as_ref()))
                .collect(),
        }
    }

    /// Registers one extension per distinct command category, subcommands included.
    pub fn from_commands(commands: &[poise::Command<Data, Error>], protected: &[&str]) -> Self {
        fn collect(command: &poise::Command<Data, Error>, names: &mut HashSet<String>) {
            if let Some(category) = &command.category {
                names.insert(category.clone());
            }
            for sub in &command.subcommands {
                collect(sub, names);
            }
        }

        let mut names = HashSet::new();
        for command in commands {
            collect(command, &mut names);
        }
        Self::new(names, protected.iter().copied())
    }

    /// Loads `name`, returning its canonical form.
    pub fn load(&self, name: &str) -> Result<String, ExtensionError> {
        let name = normalize(name);
        let mut state = self
            .loaded
            .get_mut(&name)
            .ok_or_else(|| ExtensionError::Unknown(name.clone()))?;

        if *state {
            return Err(ExtensionError::AlreadyLoaded(name));
        }
        *state = true;
        drop(state);

        info!(extension = %name, "Extension loaded");
        Ok(name)
    }

    /// Unloads `name`, returning its canonical form.
    pub fn unload(&self, name: &str) -> Result<String, ExtensionError> {
        let name = normalize(name);
        if self.protected.contains(&name) {
            return Err(ExtensionError::Protected(name));
        }

        let mut state = self
            .loaded
            .get_mut(&name)
            .ok_or_else(|| ExtensionError::Unknown(name.clone()))?;

        if !*state {
            return Err(ExtensionError::NotLoaded(name));
        }
        *state = false;
        drop(state);

        info!(extension = %name, "Extension unloaded");
        Ok(name)
    }

    /// Unloads then loads `name`. A protected extension is left loaded.
    pub fn reload(&self, name: &str) -> Result<String, ExtensionError> {
        let canonical = normalize(name);
        if self.protected.contains(&canonical) {
            return if self.loaded.contains_key(&canonical) {
                Ok(canonical)
            } else {
                Err(ExtensionError::Unknown(canonical))
            };
        }

        match self.unload(&canonical) {
            Ok(_) | Err(ExtensionError::NotLoaded(_)) => self.load(&canonical),
            Err(e) => Err(e),
        }
    }

    /// Whether commands of `category` may run.
    ///
    /// Commands without a category and unknown categories are always enabled.
    pub fn is_enabled(&self, category: Option<&str>) -> bool {
        category.map_or(true, |name| {
            self.loaded
                .get(&normalize(name))
                .map_or(true, |state| *state)
        })
    }

    /// Registered extension names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loaded.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ExtensionRegistry {
        ExtensionRegistry::new(["developer", "imitate", "guilds"], ["developer"])
    }

    #[test]
    fn test_unload_then_load() {
        let registry = registry();
        assert_eq!(registry.unload("Imitate").unwrap(), "imitate");
        assert!(!registry.is_enabled(Some("imitate")));
        assert_eq!(
            registry.unload("imitate"),
            Err(ExtensionError::NotLoaded("imitate".into()))
        );

        assert_eq!(registry.load(" IMITATE ").unwrap(), "imitate");
        assert!(registry.is_enabled(Some("imitate")));
        assert_eq!(
            registry.load("imitate"),
            Err(ExtensionError::AlreadyLoaded("imitate".into()))
        );
    }

    #[test]
    fn test_unknown_extension() {
        let registry = registry();
        assert_eq!(registry.load("music"), Err(ExtensionError::Unknown("music".into())));
        assert_eq!(registry.unload("music"), Err(ExtensionError::Unknown("music".into())));
        assert_eq!(registry.reload("music"), Err(ExtensionError::Unknown("music".into())));
    }

    #[test]
    fn test_protected_extension_stays_loaded() {
        let registry = registry();
        assert_eq!(
            registry.unload("developer"),
            Err(ExtensionError::Protected("developer".into()))
        );
        assert_eq!(registry.reload("Developer").unwrap(), "developer");
        assert!(registry.is_enabled(Some("developer")));
    }

    #[test]
    fn test_reload_restores_unloaded_extension() {
        let registry = registry();
        registry.unload("guilds").unwrap();
        assert_eq!(registry.reload("guilds").unwrap(), "guilds");
        assert!(registry.is_enabled(Some("guilds")));
    }

    #[test]
    fn test_uncategorized_commands_are_enabled() {
        let registry = registry();
        assert!(registry.is_enabled(None));
        assert!(registry.is_enabled(Some("not-registered")));
    }

    #[test]
    fn test_from_commands_collects_categories() {
        let registry =
            ExtensionRegistry::from_commands(&crate::framework::commands(), &["developer"]);
        let names = registry.names();
        for expected in ["developer", "find", "imitate", "moderation", "guilds"] {
            assert!(names.contains(&expected.to_string()), "missing {expected}");
        }
        assert!(registry.unload("developer").is_err());
    }
}
