use std::{
    any::{self, Any, TypeId},
    borrow::Cow,
    cell::RefCell,
    collections::BTreeMap,
    fmt,
    rc::Rc,
};

use crate::{BeanInstance, BoxError, ConversionError, FromPropertyValue, ResolvedValue};

/// A trait for giving a type a default [`BeanClass`].
///
/// It is not meant to be implemented by hand, `#[derive(Bean)]` generates the implementation.
///
/// # Example
///
/// ```rust
/// use sprout::{Bean, BeanType};
///
/// #[derive(Default, Bean)]
/// struct Person {
///     name: String,
///     age: i32,
/// }
///
/// # fn main() {
/// let class = Person::bean_class();
/// assert!(class.has_property("name"));
/// assert!(class.has_property("age"));
/// # }
/// ```
pub trait BeanType: Sized + 'static {
    /// Returns the class describing how to build and populate `Self`.
    fn bean_class() -> BeanClass;
}

/// A post-construction callback, run once after all properties are set.
pub trait InitializingBean {
    /// Invoked by the container after property population.
    fn after_properties_set(&mut self) -> Result<(), BoxError>;
}

/// A teardown callback, run when the container destroys its singletons.
pub trait DisposableBean {
    /// Invoked by [`destroy_singletons`](crate::DefaultListableBeanFactory::destroy_singletons).
    fn destroy(&mut self) -> Result<(), BoxError>;
}

type Constructor = Rc<dyn Fn() -> BeanInstance>;
type Setter = Rc<dyn Fn(&dyn Any, ResolvedValue) -> Result<(), ConversionError>>;
type Hook = Rc<dyn Fn(&dyn Any) -> Result<(), BoxError>>;

#[derive(Clone)]
pub(crate) struct PropertySetter {
    type_name: &'static str,
    set: Setter,
}

impl PropertySetter {
    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn set(&self, target: &BeanInstance, value: ResolvedValue) -> Result<(), ConversionError> {
        (self.set)(target.as_any(), value)
    }
}

/// Describes how the container builds and populates beans of one type.
///
/// A bean class is the explicit counterpart of reflection: it owns the
/// no-argument constructor of the type, a map from property name to a typed
/// setter, and optional init and destroy hooks.
///
/// # Example
///
/// ```rust
/// use sprout::BeanClass;
///
/// #[derive(Default)]
/// struct Counter {
///     start: u32,
/// }
///
/// # fn main() {
/// let class = BeanClass::builder::<Counter>()
///     .constructor(Counter::default)
///     .property("start", |counter: &mut Counter, start: u32| counter.start = start)
///     .build();
///
/// assert!(class.is_instantiable());
/// assert_eq!(class.property_type("start"), Some("u32"));
/// # }
/// ```
#[derive(Clone)]
pub struct BeanClass {
    name: Cow<'static, str>,
    type_name: &'static str,
    type_id: TypeId,
    constructor: Option<Constructor>,
    properties: BTreeMap<Cow<'static, str>, PropertySetter>,
    init: Option<Hook>,
    destroy: Option<Hook>,
}

impl BeanClass {
    /// Starts building the class of `T`, named after [`std::any::type_name`].
    pub fn builder<T: 'static>() -> BeanClassBuilder<T> {
        Self::builder_with_name(any::type_name::<T>())
    }

    /// Starts building the class of `T` under an explicit class name.
    pub fn builder_with_name<T: 'static>(
        name: impl Into<Cow<'static, str>>,
    ) -> BeanClassBuilder<T> {
        BeanClassBuilder {
            class: BeanClass {
                name: name.into(),
                type_name: any::type_name::<T>(),
                type_id: TypeId::of::<T>(),
                constructor: None,
                properties: BTreeMap::new(),
                init: None,
                destroy: None,
            },
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the class generated for `T` by `#[derive(Bean)]`.
    pub fn of<T: BeanType>() -> BeanClass {
        T::bean_class()
    }

    /// Returns the class name, the key used by the [`ClassRegistry`](crate::ClassRegistry).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the Rust type name of instances of this class.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the [`TypeId`] of instances of this class.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns whether the class has a constructor.
    pub fn is_instantiable(&self) -> bool {
        self.constructor.is_some()
    }

    /// Returns whether the class has a setter for `property`.
    pub fn has_property(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Returns the declared type of `property`.
    pub fn property_type(&self, property: &str) -> Option<&'static str> {
        self.properties.get(property).map(PropertySetter::type_name)
    }

    /// Returns the names of all writable properties, sorted.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(|name| &**name)
    }

    /// Returns whether the class has an init hook.
    pub fn has_init_hook(&self) -> bool {
        self.init.is_some()
    }

    /// Returns whether the class has a destroy hook.
    pub fn has_destroy_hook(&self) -> bool {
        self.destroy.is_some()
    }

    pub(crate) fn instantiate(&self) -> Option<BeanInstance> {
        self.constructor.as_ref().map(|constructor| constructor())
    }

    pub(crate) fn setter(&self, property: &str) -> Option<&PropertySetter> {
        self.properties.get(property)
    }

    pub(crate) fn run_init(&self, bean: &BeanInstance) -> Result<(), BoxError> {
        match &self.init {
            Some(init) => init(bean.as_any()),
            None => Ok(()),
        }
    }

    pub(crate) fn run_destroy(&self, bean: &BeanInstance) -> Result<(), BoxError> {
        match &self.destroy {
            Some(destroy) => destroy(bean.as_any()),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for BeanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanClass")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("instantiable", &self.is_instantiable())
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .field("init", &self.has_init_hook())
            .field("destroy", &self.has_destroy_hook())
            .finish()
    }
}

/// Builder of a [`BeanClass`] for beans of type `T`.
pub struct BeanClassBuilder<T> {
    class: BeanClass,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: 'static> BeanClassBuilder<T> {
    /// Sets the no-argument constructor.
    ///
    /// A class without a constructor stands for an abstract type: it can be
    /// named by definitions but every attempt to instantiate it fails.
    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        self.class.constructor = Some(Rc::new(move || BeanInstance::new(constructor())));
        self
    }

    /// Registers a setter for `name`.
    ///
    /// The declared type of the property is the type of the setter's second argument,
    /// values are converted with [`FromPropertyValue`].
    pub fn property<V, F>(mut self, name: impl Into<Cow<'static, str>>, setter: F) -> Self
    where
        V: FromPropertyValue,
        F: Fn(&mut T, V) + 'static,
    {
        let set = move |target: &dyn Any, value: ResolvedValue| -> Result<(), ConversionError> {
            let cell = downcast_target::<T>(target).ok_or_else(|| ConversionError::Mismatch {
                required: any::type_name::<T>(),
                actual: "a bean of another class".to_owned(),
            })?;
            let value = V::from_property_value(value)?;
            let mut bean = cell.try_borrow_mut().map_err(|_| ConversionError::Borrowed {
                type_name: any::type_name::<T>(),
            })?;

            setter(&mut *bean, value);
            Ok(())
        };

        self.class.properties.insert(
            name.into(),
            PropertySetter {
                type_name: any::type_name::<V>(),
                set: Rc::new(set),
            },
        );
        self
    }

    /// Sets a closure as the init hook.
    pub fn init_method<F>(mut self, init: F) -> Self
    where
        F: Fn(&mut T) -> Result<(), BoxError> + 'static,
    {
        self.class.init = Some(hook::<T, F>(init));
        self
    }

    /// Sets a closure as the destroy hook.
    pub fn destroy_method<F>(mut self, destroy: F) -> Self
    where
        F: Fn(&mut T) -> Result<(), BoxError> + 'static,
    {
        self.class.destroy = Some(hook::<T, F>(destroy));
        self
    }

    /// Finishes the class.
    pub fn build(self) -> BeanClass {
        self.class
    }
}

impl<T: InitializingBean + 'static> BeanClassBuilder<T> {
    /// Uses [`InitializingBean::after_properties_set`] as the init hook.
    pub fn initializing(self) -> Self {
        self.init_method(T::after_properties_set)
    }
}

impl<T: DisposableBean + 'static> BeanClassBuilder<T> {
    /// Uses [`DisposableBean::destroy`] as the destroy hook.
    pub fn disposable(self) -> Self {
        self.destroy_method(T::destroy)
    }
}

fn downcast_target<T: 'static>(target: &dyn Any) -> Option<&RefCell<T>> {
    target.downcast_ref::<RefCell<T>>()
}

fn hook<T, F>(f: F) -> Hook
where
    T: 'static,
    F: Fn(&mut T) -> Result<(), BoxError> + 'static,
{
    Rc::new(move |target: &dyn Any| -> Result<(), BoxError> {
        let cell = downcast_target::<T>(target)
            .ok_or_else(|| format!("bean is not of type '{}'", any::type_name::<T>()))?;
        let mut bean = cell
            .try_borrow_mut()
            .map_err(|_| format!("bean of type '{}' is already borrowed", any::type_name::<T>()))?;
        f(&mut *bean)
    })
}
