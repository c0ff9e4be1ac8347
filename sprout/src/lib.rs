//! # Sprout
//!
//! Sprout is a small inversion of control container for single-threaded programs.
//!
//! Beans are described by [`BeanDefinition`]s registered in a
//! [`DefaultListableBeanFactory`]. A definition names a [`BeanClass`], which
//! knows how to construct the bean and how to set each of its properties, and
//! lists the property values to inject: literals converted to the declared
//! property type, references to other beans, or inner beans.
//!
//! Definitions can inherit from a parent definition, singletons are cached
//! before their properties are populated so that circular references between
//! singletons resolve, and beans may take init and destroy hooks.
//!
//! # Example
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use sprout::{Bean, BeanDefinition, BeanFactory, DefaultListableBeanFactory};
//!
//! #[derive(Default, Bean)]
//! struct Database {
//!     url: String,
//!     pool_size: u32,
//! }
//!
//! #[derive(Default, Bean)]
//! struct Repository {
//!     database: Option<Rc<RefCell<Database>>>,
//! }
//!
//! # fn main() -> sprout::Result<()> {
//! let mut factory = DefaultListableBeanFactory::new();
//!
//! factory.register_bean_definition(
//!     "database",
//!     BeanDefinition::of::<Database>()
//!         .property("url", "postgres://localhost")
//!         .property("pool_size", "8"),
//! )?;
//! factory.register_bean_definition(
//!     "repository",
//!     BeanDefinition::of::<Repository>().property_ref("database", "database"),
//! )?;
//!
//! let repository = factory.get_bean_of::<Repository>("repository")?;
//! let database = repository.borrow().database.clone().unwrap();
//!
//! assert_eq!(database.borrow().pool_size, 8);
//! assert!(factory.get_bean("database")?.ptr_eq(&factory.get_bean("database")?));
//! # Ok(())
//! # }
//! ```
//!
//! # Feature flags
//!
//! - `sprout-macro` (default): re-exports `#[derive(Bean)]`.
//! - `auto-register` (default): derived classes register themselves into every new factory.
//! - `tracing` (default): logs registration and creation through [`tracing`](https://docs.rs/tracing).

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg_attr(docsrs, doc(cfg(feature = "auto-register")))]
#[cfg(feature = "auto-register")]
mod auto_register;
mod class;
mod convert;
mod definition;
mod error;
mod factory;
mod instance;
mod merge;
mod registry;

#[cfg_attr(docsrs, doc(cfg(feature = "auto-register")))]
#[cfg(feature = "auto-register")]
pub use auto_register::*;
pub use class::*;
pub use convert::*;
pub use definition::*;
pub use error::*;
pub use factory::*;
pub use instance::*;
pub use merge::*;
pub use registry::*;

/// Derives [`BeanType`] for a struct with named fields.
///
/// Every field becomes a property of the generated [`BeanClass`], set through a
/// plain assignment, and the bean is constructed with `Default::default`.
///
/// # Struct attributes
///
/// - `#[bean(name = "...")]`: the class name, defaults to the module path and the type name.
/// - `#[bean(constructor = path)]`: a function returning `Self`, instead of `Default::default`.
/// - `#[bean(init)]`: use [`InitializingBean::after_properties_set`] as the init hook.
/// - `#[bean(destroy)]`: use [`DisposableBean::destroy`] as the destroy hook.
/// - `#[bean(auto_register = false)]`: do not register the class automatically.
/// - `#[bean(crate = path)]`: the path of this crate, when it is renamed.
///
/// # Field attributes
///
/// - `#[bean(skip)]`: the field is not a property.
/// - `#[bean(rename = "...")]`: the property name, defaults to the field name.
#[cfg_attr(docsrs, doc(cfg(feature = "sprout-macro")))]
#[cfg(feature = "sprout-macro")]
pub use sprout_macro::Bean;
