use crate::{BeanDefinition, BeanError, BeanTarget, Result, RootBeanDefinition, Scope};

/// Merges `definition` with its parent chain into a [`RootBeanDefinition`].
///
/// `lookup` returns the definition registered under a parent name. Parents
/// are merged depth-first: the child starts from a copy of its merged parent,
/// its own properties are appended after the inherited ones, its explicit
/// scope and lazy-init flags replace the inherited ones, and its class, if it
/// names one, replaces the parent's. The abstract flag is never inherited.
///
/// # Errors
///
/// Fails with [`BeanError::DefinitionStore`] when a parent does not exist or
/// when the parent chain loops back on itself.
///
/// # Example
///
/// ```rust
/// use sprout::{merge_bean_definition, BeanClass, BeanDefinition, BeanError, Value};
///
/// struct Config;
///
/// # fn main() -> Result<(), BeanError> {
/// let parent = BeanDefinition::new(BeanClass::builder::<Config>().build()).property("p", 1);
/// let child = BeanDefinition::child("parent").property("q", 2);
///
/// let merged = merge_bean_definition("child", &child, |name| match name {
///     "parent" => Some(&parent),
///     _ => None,
/// })?;
///
/// assert!(matches!(merged.property_values().get("p"), Some(Value::Literal(p)) if p == "1"));
/// assert!(matches!(merged.property_values().get("q"), Some(Value::Literal(q)) if q == "2"));
/// # Ok(())
/// # }
/// ```
pub fn merge_bean_definition<'a, F>(
    name: &str,
    definition: &'a BeanDefinition,
    lookup: F,
) -> Result<RootBeanDefinition>
where
    F: Fn(&str) -> Option<&'a BeanDefinition>,
{
    let mut chain = vec![name.to_owned()];
    merge_chain(name, definition, &lookup, &mut chain)
}

fn merge_chain<'a, F>(
    name: &str,
    definition: &'a BeanDefinition,
    lookup: &F,
    chain: &mut Vec<String>,
) -> Result<RootBeanDefinition>
where
    F: Fn(&str) -> Option<&'a BeanDefinition>,
{
    let Some(parent_name) = definition.parent_name() else {
        return Ok(RootBeanDefinition {
            target: definition.target().clone(),
            scope: definition.explicit_scope().unwrap_or(Scope::Singleton),
            lazy_init: definition.is_lazy_init(),
            abstract_: definition.is_abstract(),
            properties: definition.property_values().clone(),
        });
    };

    if chain.iter().any(|seen| seen == parent_name) {
        chain.push(parent_name.to_owned());
        return Err(BeanError::definition_store(
            name,
            format!("circular parent chain: {}", chain.join(" -> ")),
        ));
    }

    let parent = lookup(parent_name).ok_or_else(|| {
        BeanError::definition_store(
            name,
            format!("parent definition '{}' does not exist", parent_name),
        )
    })?;

    chain.push(parent_name.to_owned());
    let mut merged = merge_chain(parent_name, parent, lookup, chain)?;
    chain.pop();

    merged.properties.extend(definition.property_values());

    if let Some(scope) = definition.explicit_scope() {
        merged.scope = scope;
    }

    if let Some(lazy_init) = definition.explicit_lazy_init() {
        merged.lazy_init = lazy_init;
    }

    if !matches!(definition.target(), BeanTarget::Inherited) {
        merged.target = definition.target().clone();
    }

    merged.abstract_ = definition.is_abstract();

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{BeanClass, Value};

    struct Thing;

    fn thing() -> BeanClass {
        BeanClass::builder::<Thing>().build()
    }

    fn merge(
        registry: &HashMap<&'static str, BeanDefinition>,
        name: &str,
    ) -> Result<RootBeanDefinition> {
        let definition = &registry[name];
        merge_bean_definition(name, definition, |parent| registry.get(parent))
    }

    fn literal(value: Option<&Value>) -> Option<&str> {
        match value {
            Some(Value::Literal(text)) => Some(&**text),
            _ => None,
        }
    }

    #[test]
    fn root_definition_is_returned_as_is() {
        let registry = HashMap::from([(
            "root",
            BeanDefinition::new(thing())
                .lazy_init(true)
                .property("a", 1),
        )]);

        let merged = merge(&registry, "root").unwrap();

        assert!(merged.is_singleton());
        assert!(merged.is_lazy_init());
        assert_eq!(merged.property_values().len(), 1);
    }

    #[test]
    fn child_appends_properties_after_parent() {
        let registry = HashMap::from([
            ("parent", BeanDefinition::new(thing()).property("p", 1).property("x", "parent")),
            ("child", BeanDefinition::child("parent").property("q", 2).property("x", "child")),
        ]);

        let merged = merge(&registry, "child").unwrap();
        let names = merged
            .property_values()
            .iter()
            .map(|property| &*property.name)
            .collect::<Vec<_>>();

        assert_eq!(names, ["p", "x", "q", "x"]);
        assert_eq!(literal(merged.property_values().get("p")), Some("1"));
        assert_eq!(literal(merged.property_values().get("q")), Some("2"));
        assert_eq!(literal(merged.property_values().get("x")), Some("child"));
        assert_eq!(merged.target().class_name(), Some(thing().name()));
    }

    #[test]
    fn flags_are_inherited_unless_overridden() {
        let registry = HashMap::from([
            (
                "parent",
                BeanDefinition::new(thing())
                    .scope(Scope::Prototype)
                    .lazy_init(true)
                    .abstract_definition(true),
            ),
            ("inherits", BeanDefinition::child("parent")),
            (
                "overrides",
                BeanDefinition::child("parent").singleton(true).lazy_init(false),
            ),
        ]);

        let inherits = merge(&registry, "inherits").unwrap();
        assert_eq!(inherits.scope(), Scope::Prototype);
        assert!(inherits.is_lazy_init());
        assert!(!inherits.is_abstract());

        let overrides = merge(&registry, "overrides").unwrap();
        assert!(overrides.is_singleton());
        assert!(!overrides.is_lazy_init());
    }

    #[test]
    fn grandchild_merges_depth_first() {
        let registry = HashMap::from([
            ("a", BeanDefinition::new(thing()).property("a", 1)),
            ("b", BeanDefinition::child("a").property("b", 2)),
            ("c", BeanDefinition::child("b").property("c", 3)),
        ]);

        let merged = merge(&registry, "c").unwrap();
        let names = merged
            .property_values()
            .iter()
            .map(|property| &*property.name)
            .collect::<Vec<_>>();

        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn missing_parent_is_a_definition_store_error() {
        let registry = HashMap::from([("orphan", BeanDefinition::child("nobody"))]);

        let err = merge(&registry, "orphan").unwrap_err();
        assert!(
            matches!(err, BeanError::DefinitionStore { ref name, ref message } if name == "orphan" && message.contains("nobody"))
        );
    }

    #[test]
    fn parent_cycle_is_a_definition_store_error() {
        let registry = HashMap::from([
            ("a", BeanDefinition::child("b")),
            ("b", BeanDefinition::child("a")),
            ("self", BeanDefinition::child("self")),
        ]);

        assert!(matches!(
            merge(&registry, "a"),
            Err(BeanError::DefinitionStore { .. })
        ));
        assert!(matches!(
            merge(&registry, "self"),
            Err(BeanError::DefinitionStore { .. })
        ));
    }
}
