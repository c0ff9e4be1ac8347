use std::{any, cell::RefCell, rc::Rc};

use crate::{
    merge_bean_definition,
    registry::{CachedSingleton, SingletonRegistry},
    BeanClass, BeanDefinition, BeanError, BeanInstance, BeanTarget, ClassRegistry,
    ConversionError, DefinitionRegistry, ResolvedValue, Result, RootBeanDefinition, Scope, Value,
};

/// The read side of a container, the part a child factory delegates to.
pub trait BeanFactory {
    /// Returns the bean registered as `name`, creating it if needed.
    fn get_bean(&self, name: &str) -> Result<BeanInstance>;

    /// Returns whether this factory, or one of its ancestors, knows `name`.
    fn contains_bean(&self, name: &str) -> bool;

    /// Returns whether `name` is a singleton.
    fn is_singleton(&self, name: &str) -> Result<bool>;
}

/// A bean factory backed by a [`DefinitionRegistry`].
///
/// It is the main entry point of the container: definitions are registered
/// into it and beans are taken out of it.
///
/// When creating a factory, you can use options to change the default
/// behavior, see [`BeanFactoryOptions`] for details.
///
/// # Example
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use sprout::{BeanClass, BeanDefinition, DefaultListableBeanFactory};
///
/// #[derive(Default)]
/// struct Engine {
///     power: u32,
/// }
///
/// #[derive(Default)]
/// struct Car {
///     engine: Option<Rc<RefCell<Engine>>>,
/// }
///
/// # fn main() -> sprout::Result<()> {
/// let engine = BeanClass::builder::<Engine>()
///     .constructor(Engine::default)
///     .property("power", |engine: &mut Engine, power: u32| engine.power = power)
///     .build();
///
/// let car = BeanClass::builder::<Car>()
///     .constructor(Car::default)
///     .property("engine", |car: &mut Car, engine: Option<Rc<RefCell<Engine>>>| {
///         car.engine = engine
///     })
///     .build();
///
/// let mut factory = DefaultListableBeanFactory::new();
/// factory.register_bean_definition("engine", BeanDefinition::new(engine).property("power", "150"))?;
/// factory.register_bean_definition("car", BeanDefinition::new(car).property_ref("engine", "engine"))?;
///
/// let car = factory.get_bean_of::<Car>("car")?;
/// let engine = car.borrow().engine.clone().unwrap();
///
/// assert_eq!(engine.borrow().power, 150);
/// assert!(Rc::ptr_eq(&engine, &factory.get_bean_of::<Engine>("engine")?));
/// # Ok(())
/// # }
/// ```
pub struct DefaultListableBeanFactory {
    registry: DefinitionRegistry,
    classes: ClassRegistry,
    parent: Option<Rc<dyn BeanFactory>>,

    singletons: RefCell<SingletonRegistry>,
    creation_chain: RefCell<CreationChain>,
}

impl Default for DefaultListableBeanFactory {
    fn default() -> Self {
        BeanFactoryOptions::default().build()
    }
}

impl DefaultListableBeanFactory {
    /// Creates a factory with the default options.
    ///
    /// With the `auto-register` feature, the class registry of the new factory
    /// holds every class generated by `#[derive(Bean)]`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new [`BeanFactoryOptions`].
    ///
    /// It is equivalent to `BeanFactoryOptions::default()`, but avoids the need
    /// to import it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::rc::Rc;
    ///
    /// use sprout::DefaultListableBeanFactory;
    ///
    /// # fn main() {
    /// let parent = Rc::new(DefaultListableBeanFactory::new());
    /// let child = DefaultListableBeanFactory::options()
    ///     .parent(parent)
    ///     .allow_override(false)
    ///     .build();
    ///
    /// assert!(child.parent().is_some());
    /// # }
    /// ```
    pub fn options() -> BeanFactoryOptions {
        BeanFactoryOptions::default()
    }

    /// Returns the parent factory.
    pub fn parent(&self) -> Option<&Rc<dyn BeanFactory>> {
        self.parent.as_ref()
    }

    /// Returns a reference to the definition registry.
    pub fn definition_registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    /// Returns a reference to the class registry.
    pub fn class_registry(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Returns the names of the beans currently being created, outermost first.
    pub fn creation_chain(&self) -> Vec<String> {
        self.creation_chain.borrow().stack.clone()
    }

    /// Registers `definition` under `name`.
    ///
    /// An existing definition under the same name is replaced, unless the
    /// factory was built with [`allow_override(false)`](BeanFactoryOptions::allow_override).
    /// The definition is not validated, a missing parent is only reported
    /// when the bean is requested.
    pub fn register_bean_definition(
        &mut self,
        name: impl Into<String>,
        definition: BeanDefinition,
    ) -> Result<()> {
        self.registry.register(name, definition)
    }

    /// Registers `alias` as another name for the bean `name`.
    pub fn register_alias(&mut self, name: &str, alias: &str) -> Result<()> {
        self.registry.register_alias(name, alias)
    }

    /// Returns the aliases of the bean `name`.
    pub fn aliases(&self, name: &str) -> Vec<&str> {
        self.registry.aliases(name)
    }

    /// Registers a class so that definitions can name it with
    /// [`BeanDefinition::with_class_name`].
    pub fn register_class(&mut self, class: BeanClass) {
        self.classes.register(class);
    }

    /// Returns the definition registered as `name`, as it was registered.
    pub fn get_bean_definition(&self, name: &str) -> Result<&BeanDefinition> {
        self.registry.get(name)
    }

    /// Returns the definition registered as `name`, merged with its parents.
    pub fn merged_bean_definition(&self, name: &str) -> Result<RootBeanDefinition> {
        let name = self.registry.canonical_name(name);
        let definition = self.registry.get(name)?;

        merge_bean_definition(name, definition, |parent| self.registry.lookup(parent))
    }

    /// Returns whether a definition is registered as `name` in this factory.
    pub fn contains_bean_definition(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Returns the names of all definitions, in registration order.
    pub fn bean_definition_names(&self) -> &[String] {
        self.registry.names()
    }

    /// Returns the number of definitions.
    pub fn bean_definition_count(&self) -> usize {
        self.registry.count()
    }

    /// Returns whether a singleton named `name` is cached.
    pub fn contains_singleton(&self, name: &str) -> bool {
        self.singletons
            .borrow()
            .contains(self.registry.canonical_name(name))
    }

    /// Returns the number of cached singletons.
    pub fn singleton_count(&self) -> usize {
        self.singletons.borrow().len()
    }

    /// Returns the bean registered as `name` as a `T`.
    ///
    /// # Errors
    ///
    /// Same as [`BeanFactory::get_bean`], plus [`BeanError::BeanNotOfRequiredType`]
    /// when the bean is not a `T`.
    pub fn get_bean_of<T: 'static>(&self, name: &str) -> Result<Rc<RefCell<T>>> {
        let bean = self.get_bean(name)?;

        bean.downcast::<T>()
            .ok_or_else(|| BeanError::BeanNotOfRequiredType {
                name: name.to_owned(),
                required: any::type_name::<T>(),
                actual: bean.type_name(),
            })
    }

    /// Creates every singleton that is neither abstract nor lazy, in registration order.
    ///
    /// # Errors
    ///
    /// Stops at the first bean that fails, returning its error.
    pub fn pre_instantiate_singletons(&self) -> Result<()> {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "pre-instantiating singletons of {} bean definitions",
            self.registry.count()
        );

        for name in self.registry.names() {
            let merged = self.merged_bean_definition(name)?;

            if merged.is_abstract() || !merged.is_singleton() || merged.is_lazy_init() {
                continue;
            }

            self.get_bean(name)?;
        }

        Ok(())
    }

    /// Runs the destroy hooks of all cached singletons, most recently created
    /// first, and empties the cache.
    ///
    /// A failing hook does not stop the others, the failure is only logged.
    pub fn destroy_singletons(&self) {
        let drained = self.singletons.borrow_mut().drain();

        #[cfg(feature = "tracing")]
        tracing::info!("destroying {} singletons", drained.len());

        for (_name, singleton) in drained {
            if let Err(_err) = singleton.class.run_destroy(&singleton.instance) {
                #[cfg(feature = "tracing")]
                tracing::warn!("(!) destroy hook of bean '{}' failed: {}", _name, _err);
            }
        }
    }
}

impl BeanFactory for DefaultListableBeanFactory {
    /// Returns the bean registered as `name`, creating it if needed.
    ///
    /// Singletons are created once and cached, prototypes are created anew on
    /// every call. When no definition is registered as `name`, the call is
    /// delegated to the parent factory, if any.
    ///
    /// # Errors
    ///
    /// - [`BeanError::InvalidArgument`] if `name` is empty.
    /// - [`BeanError::NotFound`] if neither this factory nor its ancestors know `name`.
    /// - [`BeanError::Instantiation`] if the bean is abstract or its class has no constructor.
    /// - [`BeanError::DefinitionStore`] if its definition chain is malformed.
    /// - [`BeanError::BeanCreation`] if populating or initializing it failed.
    fn get_bean(&self, name: &str) -> Result<BeanInstance> {
        if name.is_empty() {
            return Err(BeanError::InvalidArgument);
        }

        let name = self.registry.canonical_name(name);

        let cached = self.singletons.borrow().get(name);
        if let Some(bean) = cached {
            #[cfg(feature = "tracing")]
            tracing::debug!("returning cached instance of singleton bean '{}'", name);

            return Ok(bean);
        }

        let merged = match self.merged_bean_definition(name) {
            Ok(merged) => merged,
            Err(err) if err.is_not_found() => {
                return match &self.parent {
                    Some(parent) => parent.get_bean(name),
                    None => Err(err),
                };
            }
            Err(err) => return Err(err),
        };

        self.create_bean(name, &merged)
    }

    fn contains_bean(&self, name: &str) -> bool {
        if self.contains_singleton(name) || self.contains_bean_definition(name) {
            return true;
        }

        self.parent
            .as_ref()
            .is_some_and(|parent| parent.contains_bean(name))
    }

    fn is_singleton(&self, name: &str) -> Result<bool> {
        if self.contains_singleton(name) {
            return Ok(true);
        }

        match self.merged_bean_definition(name) {
            Ok(merged) => Ok(merged.is_singleton()),
            Err(err) if err.is_not_found() => match &self.parent {
                Some(parent) => parent.is_singleton(name),
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }
}

impl DefaultListableBeanFactory {
    fn create_bean(&self, name: &str, merged: &RootBeanDefinition) -> Result<BeanInstance> {
        let class = self.resolve_class(name, merged)?;

        self.creation_chain.borrow_mut().push(name)?;
        let result = self.do_create_bean(name, merged, &class);
        self.creation_chain.borrow_mut().pop();

        if result.is_err() && merged.is_singleton() {
            let _evicted = self.singletons.borrow_mut().evict(name);

            #[cfg(feature = "tracing")]
            if !_evicted.is_empty() {
                tracing::warn!(
                    "(!) creation of bean '{}' failed, evicted singletons: {:?}",
                    name,
                    _evicted
                );
            }
        }

        result
    }

    fn resolve_class(&self, name: &str, merged: &RootBeanDefinition) -> Result<Rc<BeanClass>> {
        if merged.is_abstract() {
            return Err(BeanError::instantiation(name, "bean definition is abstract"));
        }

        match merged.target() {
            BeanTarget::Class(class) => Ok(class.clone()),
            BeanTarget::ClassName(class_name) => self.classes.get(class_name).ok_or_else(|| {
                BeanError::definition_store(
                    name,
                    format!("cannot find bean class '{}'", class_name),
                )
            }),
            BeanTarget::Inherited => Err(BeanError::instantiation(
                name,
                "bean definition has no class",
            )),
        }
    }

    fn do_create_bean(
        &self,
        name: &str,
        merged: &RootBeanDefinition,
        class: &Rc<BeanClass>,
    ) -> Result<BeanInstance> {
        #[cfg(feature = "tracing")]
        tracing::debug!("creating instance of bean '{}' of class '{}'", name, class.name());

        let bean = class.instantiate().ok_or_else(|| {
            BeanError::instantiation(
                name,
                format!(
                    "class '{}' has no constructor, is it an abstract type?",
                    class.name()
                ),
            )
        })?;

        if merged.is_singleton() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "eagerly caching bean '{}' to allow for resolving potential circular references",
                name
            );

            self.singletons.borrow_mut().insert(
                name.to_owned(),
                CachedSingleton {
                    instance: bean.clone(),
                    class: class.clone(),
                },
            );
        }

        self.populate_bean(name, merged, class, &bean)?;

        class.run_init(&bean).map_err(|source| {
            BeanError::creation(
                name,
                "invocation of init method failed",
                BeanError::Lifecycle {
                    name: name.to_owned(),
                    source,
                },
            )
        })?;

        Ok(bean)
    }

    fn populate_bean(
        &self,
        name: &str,
        merged: &RootBeanDefinition,
        class: &BeanClass,
        bean: &BeanInstance,
    ) -> Result<()> {
        let properties = merged.property_values();

        if properties.is_empty() {
            return Ok(());
        }

        let mut resolved = Vec::with_capacity(properties.len());

        for property in properties {
            let value = self.resolve_value(name, &property.name, &property.value)?;
            resolved.push((&*property.name, value));
        }

        self.apply_property_values(name, class, bean, resolved)
            .map_err(|err| BeanError::creation(name, "error setting property values", err))
    }

    fn resolve_value(&self, name: &str, property: &str, value: &Value) -> Result<ResolvedValue> {
        match value {
            Value::Literal(text) => Ok(ResolvedValue::Literal(text.clone())),
            Value::Reference(target) => self.resolve_reference(name, property, target),
            Value::Inner(definition) => self.resolve_inner_bean(name, property, definition),
        }
    }

    fn resolve_reference(&self, name: &str, property: &str, target: &str) -> Result<ResolvedValue> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "resolving reference from property '{}' in bean '{}' to bean '{}'",
            property,
            name,
            target
        );

        match self.get_bean(target) {
            Ok(bean) => {
                self.singletons
                    .borrow_mut()
                    .register_dependent(self.registry.canonical_name(target), name);

                Ok(ResolvedValue::Bean(bean))
            }
            Err(err) => Err(BeanError::creation(
                name,
                format!(
                    "can't resolve reference to bean '{}' while setting property '{}'",
                    target, property
                ),
                err,
            )),
        }
    }

    fn resolve_inner_bean(
        &self,
        name: &str,
        property: &str,
        definition: &BeanDefinition,
    ) -> Result<ResolvedValue> {
        let inner_name = format!("(inner bean for property '{}.{}')", name, property);

        let wrap = |err: BeanError| {
            BeanError::creation(
                name,
                format!("cannot create inner bean for property '{}'", property),
                err,
            )
        };

        let mut merged =
            merge_bean_definition(&inner_name, definition, |parent| self.registry.lookup(parent))
                .map_err(wrap)?;

        // an inner bean is never cached
        merged.scope = Scope::Prototype;

        let bean = self.create_bean(&inner_name, &merged).map_err(wrap)?;

        self.singletons
            .borrow_mut()
            .register_dependent(&inner_name, name);

        Ok(ResolvedValue::Bean(bean))
    }

    fn apply_property_values(
        &self,
        name: &str,
        class: &BeanClass,
        bean: &BeanInstance,
        resolved: Vec<(&str, ResolvedValue)>,
    ) -> Result<()> {
        for (property, value) in resolved {
            let setter = class
                .setter(property)
                .ok_or_else(|| BeanError::NotWritableProperty {
                    name: name.to_owned(),
                    class: class.name().to_owned(),
                    property: property.to_owned(),
                })?;

            setter.set(bean, value).map_err(|err| match err {
                ConversionError::Unsupported { type_name } => BeanError::UnsupportedType {
                    name: name.to_owned(),
                    property: property.to_owned(),
                    type_name,
                },
                source => BeanError::TypeMismatch {
                    name: name.to_owned(),
                    property: property.to_owned(),
                    source,
                },
            })?;
        }

        Ok(())
    }
}

/// Options and flags which can be used to configure how a factory is created.
///
/// Generally speaking, you'll first call [`BeanFactoryOptions::default`] (or
/// [`DefaultListableBeanFactory::options`]), then chain calls to methods to set
/// each option, then call [`BeanFactoryOptions::build`].
///
/// # Example
///
/// ```rust
/// use sprout::{BeanClass, BeanFactoryOptions};
///
/// #[derive(Default)]
/// struct Cache;
///
/// # fn main() {
/// let factory = BeanFactoryOptions::default()
///     .allow_override(false)
///     .class(BeanClass::builder_with_name::<Cache>("Cache").constructor(Cache::default).build())
///     .build();
///
/// assert!(factory.class_registry().contains("Cache"));
/// assert!(!factory.definition_registry().allow_override());
/// # }
/// ```
pub struct BeanFactoryOptions {
    allow_override: bool,
    #[cfg(feature = "auto-register")]
    auto_register_classes: bool,
    parent: Option<Rc<dyn BeanFactory>>,
    classes: Vec<BeanClass>,
}

impl Default for BeanFactoryOptions {
    fn default() -> Self {
        Self {
            allow_override: true,
            #[cfg(feature = "auto-register")]
            auto_register_classes: true,
            parent: None,
            classes: Vec::new(),
        }
    }
}

impl BeanFactoryOptions {
    /// Sets whether registering a definition under a taken name replaces the
    /// old one (`true`, the default) or fails with [`BeanError::DefinitionStore`].
    pub fn allow_override(mut self, allow_override: bool) -> Self {
        self.allow_override = allow_override;
        self
    }

    /// Sets whether the class registry starts with every auto-registered class, default `true`.
    #[cfg_attr(docsrs, doc(cfg(feature = "auto-register")))]
    #[cfg(feature = "auto-register")]
    pub fn auto_register_classes(mut self, auto_register_classes: bool) -> Self {
        self.auto_register_classes = auto_register_classes;
        self
    }

    /// Sets the parent factory, consulted for names this factory does not define.
    pub fn parent(mut self, parent: Rc<dyn BeanFactory>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Appends a class to the class registry of the factory.
    pub fn class(mut self, class: BeanClass) -> Self {
        self.classes.push(class);
        self
    }

    /// Creates the factory.
    pub fn build(self) -> DefaultListableBeanFactory {
        let BeanFactoryOptions {
            allow_override,
            #[cfg(feature = "auto-register")]
            auto_register_classes,
            parent,
            classes,
        } = self;

        #[cfg(feature = "auto-register")]
        let mut class_registry = if auto_register_classes {
            crate::auto_registered_class_registry()
        } else {
            ClassRegistry::default()
        };

        #[cfg(not(feature = "auto-register"))]
        let mut class_registry = ClassRegistry::default();

        classes
            .into_iter()
            .for_each(|class| class_registry.register(class));

        DefaultListableBeanFactory {
            registry: DefinitionRegistry::with_allow_override(allow_override),
            classes: class_registry,
            parent,
            singletons: Default::default(),
            creation_chain: Default::default(),
        }
    }
}

#[derive(Default)]
struct CreationChain {
    stack: Vec<String>,
}

impl CreationChain {
    fn push(&mut self, name: &str) -> Result<()> {
        if self.stack.iter().any(|n| n == name) {
            let mut buf = String::with_capacity(128);

            self.stack.iter().for_each(|n| {
                buf.push_str(n);
                buf.push_str(" -> ");
            });

            buf.push_str(name);

            return Err(BeanError::CurrentlyInCreation {
                name: name.to_owned(),
                chain: buf,
            });
        }

        self.stack.push(name.to_owned());
        Ok(())
    }

    fn pop(&mut self) {
        self.stack.pop();
    }
}
