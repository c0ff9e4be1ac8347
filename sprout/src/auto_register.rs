#[doc(hidden)]
pub use inventory::submit;

use crate::{BeanClass, ClassRegistry};

#[doc(hidden)]
pub struct ClassRegister {
    pub register: fn() -> BeanClass,
}

inventory::collect!(ClassRegister);

/// Returns an iterator over all auto-registered bean classes.
///
/// Every type deriving `Bean` (without `#[bean(auto_register = false)]`) is
/// collected here. [`BeanFactoryOptions`](crate::BeanFactoryOptions) uses this
/// function to fill the [`ClassRegistry`] of a new factory, so definitions can
/// name those types with [`BeanDefinition::with_class_name`](crate::BeanDefinition::with_class_name).
///
/// # Example
///
/// ```rust
/// use sprout::{auto_registered_classes, Bean};
///
/// #[derive(Default, Bean)]
/// struct Greeter {
///     greeting: String,
/// }
///
/// # fn main() {
/// assert!(auto_registered_classes().any(|class| class.name().ends_with("Greeter")));
/// # }
/// ```
pub fn auto_registered_classes() -> impl Iterator<Item = BeanClass> {
    inventory::iter::<ClassRegister>
        .into_iter()
        .map(|register| (register.register)())
}

/// Returns a [`ClassRegistry`] holding every auto-registered class.
pub fn auto_registered_class_registry() -> ClassRegistry {
    let mut registry = ClassRegistry::default();
    auto_registered_classes().for_each(|class| registry.register(class));
    registry
}

/// Register a [`BeanClass`] that will be collected by [`auto_registered_classes`].
///
/// `#[derive(Bean)]` does this on its own. Use the macro for classes built by
/// hand with [`BeanClass::builder`].
///
/// # Example
///
/// ```rust
/// use sprout::{auto_registered_classes, register_class, BeanClass};
///
/// #[derive(Default)]
/// struct Clock {
///     offset: i64,
/// }
///
/// fn clock() -> BeanClass {
///     BeanClass::builder_with_name::<Clock>("Clock")
///         .constructor(Clock::default)
///         .property("offset", |clock: &mut Clock, offset: i64| clock.offset = offset)
///         .build()
/// }
///
/// register_class!(clock());
///
/// fn main() {
///     assert!(auto_registered_classes().any(|class| class.name() == "Clock"));
/// }
/// ```
#[macro_export]
macro_rules! register_class {
    ($class:expr) => {
        const _: () = {
            fn register() -> $crate::BeanClass {
                $class
            }

            $crate::submit! {
                $crate::ClassRegister {
                    register
                }
            }
        };
    };
}

/// Generate a function to enable auto-registration.
///
/// A crate that only depends on another crate does not pull in that crate's
/// auto-registered classes unless it uses something from it. This macro
/// generates a `pub fn enable()` that other crates call to force the link,
/// and that can chain the `enable` functions of its own dependencies.
///
/// # Example
///
/// ```rust ignore
/// // beans/src/lib.rs
/// sprout::enable! {}
///
/// // app/src/main.rs
/// fn main() {
///     beans::enable();
///     let factory = sprout::DefaultListableBeanFactory::new();
/// }
/// ```
#[macro_export]
macro_rules! enable {
    ($($body:tt)*) => {
        /// Enable auto-registration.
        pub fn enable() {
            $($body)*
        }
    };
}
