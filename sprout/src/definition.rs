use std::{borrow::Cow, fmt, rc::Rc};

use crate::{BeanClass, BeanType};

/// Represents how many instances the container creates for a definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    /// one shared instance per name, created once and cached.
    Singleton,
    /// a new instance on every request, never cached.
    Prototype,
}

/// The type a definition builds.
#[derive(Clone)]
pub enum BeanTarget {
    /// A class known at registration time.
    Class(Rc<BeanClass>),
    /// A class looked up by name in the [`ClassRegistry`](crate::ClassRegistry) when the bean is created.
    ClassName(Cow<'static, str>),
    /// No class of its own, a child definition inherits the one of its parent.
    Inherited,
}

impl BeanTarget {
    /// Returns the class name, if the target names one.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            BeanTarget::Class(class) => Some(class.name()),
            BeanTarget::ClassName(name) => Some(name),
            BeanTarget::Inherited => None,
        }
    }
}

impl fmt::Debug for BeanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeanTarget::Class(class) => f.debug_tuple("Class").field(&class.name()).finish(),
            BeanTarget::ClassName(name) => f.debug_tuple("ClassName").field(name).finish(),
            BeanTarget::Inherited => f.write_str("Inherited"),
        }
    }
}

/// The value of one property assignment.
#[derive(Clone, Debug)]
pub enum Value {
    /// Literal text, converted to the declared type of the property.
    Literal(Cow<'static, str>),
    /// The name of another bean.
    Reference(Cow<'static, str>),
    /// An inner bean, always created as a fresh non-singleton.
    Inner(Box<BeanDefinition>),
}

impl Value {
    /// Creates a literal value.
    pub fn literal(text: impl Into<Cow<'static, str>>) -> Self {
        Value::Literal(text.into())
    }

    /// Creates a reference to another bean.
    pub fn reference(name: impl Into<Cow<'static, str>>) -> Self {
        Value::Reference(name.into())
    }

    /// Creates an inner bean value.
    pub fn inner(definition: BeanDefinition) -> Self {
        Value::Inner(Box::new(definition))
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::Literal(Cow::Borrowed(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Literal(Cow::Owned(value))
    }
}

macro_rules! literal_from_integers {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Literal(Cow::Owned(value.to_string()))
                }
            }
        )*
    };
}

literal_from_integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BeanDefinition> for Value {
    fn from(value: BeanDefinition) -> Self {
        Value::inner(value)
    }
}

/// One `(name, value)` assignment of a definition.
#[derive(Clone, Debug)]
pub struct PropertyValue {
    /// The property name.
    pub name: Cow<'static, str>,
    /// The value to assign.
    pub value: Value,
}

/// An ordered list of property assignments.
///
/// The same name may appear more than once; assignments are applied in
/// order, so the last one wins.
#[derive(Clone, Debug, Default)]
pub struct PropertyValues {
    values: Vec<PropertyValue>,
}

impl PropertyValues {
    /// Appends an assignment.
    pub fn add(&mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Value>) {
        self.values.push(PropertyValue {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Appends all assignments of `other` after the current ones.
    pub fn extend(&mut self, other: &PropertyValues) {
        self.values.extend(other.values.iter().cloned());
    }

    /// Returns the last value assigned to `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .rev()
            .find(|property| property.name == name)
            .map(|property| &property.value)
    }

    /// Returns whether `name` is assigned at least once.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of assignments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether there are no assignments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the assignments in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PropertyValue> {
        self.values.iter()
    }
}

impl<'a> IntoIterator for &'a PropertyValues {
    type Item = &'a PropertyValue;
    type IntoIter = std::slice::Iter<'a, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Describes how to build one bean.
///
/// A definition without a parent is a root definition. A definition with a
/// parent is merged with its parent chain before a bean is created, see
/// [`merge_bean_definition`](crate::merge_bean_definition).
///
/// # Example
///
/// ```rust
/// use sprout::{BeanClass, BeanDefinition, Scope};
///
/// #[derive(Default)]
/// struct Pool {
///     size: usize,
/// }
///
/// # fn main() {
/// let class = BeanClass::builder::<Pool>()
///     .constructor(Pool::default)
///     .property("size", |pool: &mut Pool, size: usize| pool.size = size)
///     .build();
///
/// let parent = BeanDefinition::new(class).property("size", 4);
/// let child = BeanDefinition::child("pool").scope(Scope::Prototype);
///
/// assert!(parent.is_singleton());
/// assert!(!child.is_singleton());
/// assert_eq!(child.parent_name(), Some("pool"));
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BeanDefinition {
    target: BeanTarget,
    scope: Option<Scope>,
    lazy_init: Option<bool>,
    abstract_: bool,
    parent: Option<Cow<'static, str>>,
    properties: PropertyValues,
}

impl BeanDefinition {
    fn with_target(target: BeanTarget) -> Self {
        Self {
            target,
            scope: None,
            lazy_init: None,
            abstract_: false,
            parent: None,
            properties: PropertyValues::default(),
        }
    }

    /// Creates a root definition for `class`.
    pub fn new(class: BeanClass) -> Self {
        Self::with_target(BeanTarget::Class(Rc::new(class)))
    }

    /// Creates a root definition for a class shared with other definitions.
    pub fn with_shared_class(class: Rc<BeanClass>) -> Self {
        Self::with_target(BeanTarget::Class(class))
    }

    /// Creates a root definition for the class generated for `T`.
    pub fn of<T: BeanType>() -> Self {
        Self::new(T::bean_class())
    }

    /// Creates a root definition whose class is looked up by name when the bean is created.
    pub fn with_class_name(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_target(BeanTarget::ClassName(name.into()))
    }

    /// Creates a child definition of the definition registered as `parent`.
    pub fn child(parent: impl Into<Cow<'static, str>>) -> Self {
        Self {
            parent: Some(parent.into()),
            ..Self::with_target(BeanTarget::Inherited)
        }
    }

    /// Sets the parent of the definition.
    pub fn parent(mut self, parent: impl Into<Cow<'static, str>>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the target class, overriding the parent's one.
    pub fn class(mut self, class: BeanClass) -> Self {
        self.target = BeanTarget::Class(Rc::new(class));
        self
    }

    /// Sets the scope explicitly.
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Shorthand for [`Scope::Singleton`] or [`Scope::Prototype`].
    pub fn singleton(self, singleton: bool) -> Self {
        self.scope(if singleton {
            Scope::Singleton
        } else {
            Scope::Prototype
        })
    }

    /// Sets whether [`pre_instantiate_singletons`](crate::DefaultListableBeanFactory::pre_instantiate_singletons) skips the bean.
    pub fn lazy_init(mut self, lazy_init: bool) -> Self {
        self.lazy_init = Some(lazy_init);
        self
    }

    /// Marks the definition as a template that only serves as a parent.
    pub fn abstract_definition(mut self, abstract_: bool) -> Self {
        self.abstract_ = abstract_;
        self
    }

    /// Appends a property assignment.
    pub fn property(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        self.properties.add(name, value);
        self
    }

    /// Appends a reference to the bean named `bean`.
    pub fn property_ref(
        self,
        name: impl Into<Cow<'static, str>>,
        bean: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.property(name, Value::reference(bean))
    }

    /// Returns the target.
    pub fn target(&self) -> &BeanTarget {
        &self.target
    }

    /// Returns the scope set on this definition, `None` if it is inherited or defaulted.
    pub fn explicit_scope(&self) -> Option<Scope> {
        self.scope
    }

    /// Returns the lazy-init flag set on this definition, `None` if it is inherited or defaulted.
    pub fn explicit_lazy_init(&self) -> Option<bool> {
        self.lazy_init
    }

    /// Returns whether the definition describes a singleton, defaulting to `true`.
    pub fn is_singleton(&self) -> bool {
        self.scope.unwrap_or(Scope::Singleton) == Scope::Singleton
    }

    /// Returns whether the definition is lazily initialized, defaulting to `false`.
    pub fn is_lazy_init(&self) -> bool {
        self.lazy_init.unwrap_or(false)
    }

    /// Returns whether the definition is abstract.
    pub fn is_abstract(&self) -> bool {
        self.abstract_
    }

    /// Returns the name of the parent definition.
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Returns the property assignments of this definition only.
    pub fn property_values(&self) -> &PropertyValues {
        &self.properties
    }
}

/// A fully merged definition, with no parent left to resolve.
#[derive(Clone, Debug)]
pub struct RootBeanDefinition {
    pub(crate) target: BeanTarget,
    pub(crate) scope: Scope,
    pub(crate) lazy_init: bool,
    pub(crate) abstract_: bool,
    pub(crate) properties: PropertyValues,
}

impl RootBeanDefinition {
    /// Returns the target.
    pub fn target(&self) -> &BeanTarget {
        &self.target
    }

    /// Returns the resolved scope.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Returns whether the bean is a singleton.
    pub fn is_singleton(&self) -> bool {
        self.scope == Scope::Singleton
    }

    /// Returns whether the bean is lazily initialized.
    pub fn is_lazy_init(&self) -> bool {
        self.lazy_init
    }

    /// Returns whether the definition is abstract.
    pub fn is_abstract(&self) -> bool {
        self.abstract_
    }

    /// Returns all property assignments, inherited ones first.
    pub fn property_values(&self) -> &PropertyValues {
        &self.properties
    }
}
