use std::{
    borrow::Cow,
    collections::{BTreeSet, HashMap},
    rc::Rc,
};

use crate::{BeanClass, BeanDefinition, BeanError, BeanInstance, Result};

/// Maps bean names to their definitions.
///
/// Registration is purely additive and does not validate the definition,
/// a definition naming a missing parent only fails when it is merged.
///
/// # Example
///
/// ```rust
/// use sprout::{BeanClass, BeanDefinition, DefinitionRegistry};
///
/// struct Service;
///
/// # fn main() -> sprout::Result<()> {
/// let mut registry = DefinitionRegistry::default();
/// registry.register("service", BeanDefinition::new(BeanClass::builder::<Service>().build()))?;
/// registry.register_alias("service", "svc")?;
///
/// assert!(registry.contains("svc"));
/// assert_eq!(registry.count(), 1);
/// assert!(registry.get("missing").unwrap_err().is_not_found());
/// # Ok(())
/// # }
/// ```
pub struct DefinitionRegistry {
    allow_override: bool,
    definitions: HashMap<String, BeanDefinition>,
    names: Vec<String>,
    aliases: HashMap<String, String>,
}

impl Default for DefinitionRegistry {
    fn default() -> Self {
        Self {
            allow_override: true,
            definitions: Default::default(),
            names: Default::default(),
            aliases: Default::default(),
        }
    }
}

impl DefinitionRegistry {
    pub(crate) fn with_allow_override(allow_override: bool) -> Self {
        Self {
            allow_override,
            ..Default::default()
        }
    }

    /// Returns whether registering an existing name replaces the old definition.
    pub fn allow_override(&self) -> bool {
        self.allow_override
    }

    /// Registers `definition` under `name`, replacing any definition already there.
    ///
    /// # Errors
    ///
    /// - [`BeanError::InvalidArgument`] if `name` is empty.
    /// - [`BeanError::DefinitionStore`] if `name` is taken and overriding is disallowed.
    pub fn register(&mut self, name: impl Into<String>, definition: BeanDefinition) -> Result<()> {
        let name = name.into();

        if name.is_empty() {
            return Err(BeanError::InvalidArgument);
        }

        if !self.definitions.contains_key(&name) {
            #[cfg(feature = "tracing")]
            tracing::debug!("(+) register bean definition '{}': {:?}", name, definition);

            self.names.push(name.clone());
        } else if self.allow_override {
            #[cfg(feature = "tracing")]
            tracing::warn!("(!) override bean definition '{}': {:?}", name, definition);
        } else {
            return Err(BeanError::definition_store(
                name,
                "a definition is already registered under this name and overriding is disallowed",
            ));
        }

        self.aliases.remove(&name);
        self.definitions.insert(name, definition);
        Ok(())
    }

    /// Returns the definition registered under `name` or one of its aliases.
    pub fn get(&self, name: &str) -> Result<&BeanDefinition> {
        self.definitions
            .get(self.canonical_name(name))
            .ok_or_else(|| BeanError::not_found(name))
    }

    /// Returns whether a definition is registered under `name` or one of its aliases.
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(self.canonical_name(name))
    }

    /// Returns all definition names, in registration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the number of definitions.
    pub fn count(&self) -> usize {
        self.definitions.len()
    }

    /// Registers `alias` as another name for `name`.
    ///
    /// # Errors
    ///
    /// - [`BeanError::InvalidArgument`] if either name is empty.
    /// - [`BeanError::DefinitionStore`] if `alias` is already the name of a definition,
    ///   or if `name` resolves back to `alias` through existing aliases.
    pub fn register_alias(&mut self, name: &str, alias: &str) -> Result<()> {
        if name.is_empty() || alias.is_empty() {
            return Err(BeanError::InvalidArgument);
        }

        if name == alias {
            return Ok(());
        }

        if self.definitions.contains_key(alias) {
            return Err(BeanError::definition_store(
                alias,
                format!("cannot register alias for '{}', a definition already uses this name", name),
            ));
        }

        if self.canonical_name(name) == alias {
            return Err(BeanError::definition_store(
                alias,
                format!(
                    "cannot register alias '{}' for '{}', '{}' is already an alias of '{}'",
                    alias, name, name, alias
                ),
            ));
        }

        self.aliases.insert(alias.to_owned(), name.to_owned());
        Ok(())
    }

    /// Returns all aliases registered for `name`, sorted.
    pub fn aliases(&self, name: &str) -> Vec<&str> {
        let mut aliases = self
            .aliases
            .iter()
            .filter(|(_, target)| *target == name)
            .map(|(alias, _)| alias.as_str())
            .collect::<Vec<_>>();
        aliases.sort_unstable();
        aliases
    }

    /// Resolves `name` through the alias table, returns `name` itself when it is not an alias.
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        let mut current = name;
        let mut hops = 0;

        while let Some(target) = self.aliases.get(current) {
            current = target;
            hops += 1;

            if hops > self.aliases.len() {
                break;
            }
        }

        current
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<&BeanDefinition> {
        self.definitions.get(self.canonical_name(name))
    }
}

/// Maps class names to bean classes, so that definitions can name their type by string.
#[derive(Default, Debug)]
pub struct ClassRegistry {
    classes: HashMap<Cow<'static, str>, Rc<BeanClass>>,
}

impl ClassRegistry {
    /// Registers `class` under its [`name`](BeanClass::name), replacing any class of the same name.
    pub fn register(&mut self, class: BeanClass) {
        let name = Cow::Owned(class.name().to_owned());

        #[cfg(feature = "tracing")]
        tracing::debug!("(+) register bean class '{}'", name);

        self.classes.insert(name, Rc::new(class));
    }

    /// Returns the class registered as `name`.
    pub fn get(&self, name: &str) -> Option<Rc<BeanClass>> {
        self.classes.get(name).cloned()
    }

    /// Returns whether a class is registered as `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Returns the number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns whether no class is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

pub(crate) struct CachedSingleton {
    pub(crate) instance: BeanInstance,
    pub(crate) class: Rc<BeanClass>,
}

#[derive(Default)]
pub(crate) struct SingletonRegistry {
    registry: HashMap<String, CachedSingleton>,
    order: Vec<String>,
    dependents: HashMap<String, BTreeSet<String>>,
}

impl SingletonRegistry {
    pub(crate) fn insert(&mut self, name: String, singleton: CachedSingleton) {
        if self.registry.insert(name.clone(), singleton).is_none() {
            self.order.push(name);
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<BeanInstance> {
        self.registry
            .get(name)
            .map(|singleton| singleton.instance.clone())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.len()
    }

    pub(crate) fn register_dependent(&mut self, bean: &str, dependent: &str) {
        self.dependents
            .entry(bean.to_owned())
            .or_default()
            .insert(dependent.to_owned());
    }

    /// Removes `name` and every singleton that depends on it, directly or not.
    ///
    /// Dependencies are followed through names that are not cached themselves,
    /// a singleton holding a prototype that holds `name` is evicted as well.
    pub(crate) fn evict(&mut self, name: &str) -> Vec<String> {
        let mut evicted = Vec::new();
        let mut visited = BTreeSet::new();
        let mut pending = vec![name.to_owned()];

        while let Some(name) = pending.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }

            if let Some(dependents) = self.dependents.remove(&name) {
                pending.extend(dependents);
            }

            if self.registry.remove(&name).is_some() {
                self.order.retain(|n| n != &name);
                evicted.push(name);
            }
        }

        evicted
    }

    /// Removes all singletons, most recently created first.
    pub(crate) fn drain(&mut self) -> Vec<(String, CachedSingleton)> {
        let mut drained = Vec::with_capacity(self.order.len());

        while let Some(name) = self.order.pop() {
            if let Some(singleton) = self.registry.remove(&name) {
                drained.push((name, singleton));
            }
        }

        self.registry.clear();
        self.dependents.clear();
        drained
    }
}
