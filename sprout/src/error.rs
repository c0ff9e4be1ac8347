use std::{borrow::Cow, num::ParseIntError};

use thiserror::Error;

/// Error type returned by init and destroy hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type used throughout the container.
pub type Result<T, E = BeanError> = std::result::Result<T, E>;

/// Errors raised while registering, merging or creating beans.
#[derive(Debug, Error)]
pub enum BeanError {
    /// The bean name was empty.
    #[error("bean name must not be empty")]
    InvalidArgument,

    /// No bean or definition with this name, and no parent factory knows it either.
    #[error("no bean named '{name}' is defined")]
    NotFound {
        /// The requested name.
        name: String,
    },

    /// The bean could not be constructed.
    #[error("cannot instantiate bean '{name}': {reason}")]
    Instantiation {
        /// The bean being created.
        name: String,
        /// Why construction was impossible.
        reason: Cow<'static, str>,
    },

    /// Wraps any failure that happened while populating or initializing a bean.
    #[error("error creating bean '{name}': {message}")]
    BeanCreation {
        /// The bean being created.
        name: String,
        /// What the container was doing when the failure happened.
        message: String,
        /// The underlying failure.
        #[source]
        source: Box<BeanError>,
    },

    /// A definition, or a chain of definitions, is malformed.
    #[error("invalid bean definition '{name}': {message}")]
    DefinitionStore {
        /// The definition at fault.
        name: String,
        /// What is wrong with it.
        message: String,
    },

    /// A literal was assigned to a property whose type the container cannot convert to.
    #[error("property '{property}' of bean '{name}' has unsupported type '{type_name}'")]
    UnsupportedType {
        /// The bean being populated.
        name: String,
        /// The property being set.
        property: String,
        /// The declared type of the property.
        type_name: &'static str,
    },

    /// A value could not be converted to the declared type of a property.
    #[error("failed to convert value of property '{property}' of bean '{name}'")]
    TypeMismatch {
        /// The bean being populated.
        name: String,
        /// The property being set.
        property: String,
        /// The conversion failure.
        #[source]
        source: ConversionError,
    },

    /// The bean class has no setter for the property.
    #[error("bean '{name}' of class '{class}' has no writable property '{property}'")]
    NotWritableProperty {
        /// The bean being populated.
        name: String,
        /// The class of the bean.
        class: String,
        /// The property that was configured.
        property: String,
    },

    /// A typed lookup found a bean of another type.
    #[error("bean '{name}' is expected to be of type '{required}' but is actually of type '{actual}'")]
    BeanNotOfRequiredType {
        /// The requested bean.
        name: String,
        /// The requested type.
        required: &'static str,
        /// The type of the instance found.
        actual: &'static str,
    },

    /// A non-singleton bean depends on itself, directly or indirectly.
    #[error("bean '{name}' is currently in creation, circular reference: {chain}")]
    CurrentlyInCreation {
        /// The bean that was requested again.
        name: String,
        /// The creation chain that leads back to it.
        chain: String,
    },

    /// An init hook returned an error.
    #[error("lifecycle callback of bean '{name}' failed")]
    Lifecycle {
        /// The bean whose hook failed.
        name: String,
        /// The hook's error.
        #[source]
        source: BoxError,
    },
}

impl BeanError {
    pub(crate) fn not_found(name: impl Into<String>) -> Self {
        BeanError::NotFound { name: name.into() }
    }

    pub(crate) fn definition_store(name: impl Into<String>, message: impl Into<String>) -> Self {
        BeanError::DefinitionStore {
            name: name.into(),
            message: message.into(),
        }
    }

    pub(crate) fn instantiation(
        name: impl Into<String>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        BeanError::Instantiation {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn creation(
        name: impl Into<String>,
        message: impl Into<String>,
        source: BeanError,
    ) -> Self {
        BeanError::BeanCreation {
            name: name.into(),
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Returns whether this is a [`BeanError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, BeanError::NotFound { .. })
    }

    /// Follows the chain of [`BeanError::BeanCreation`] wrappers down to the
    /// failure that started it.
    ///
    /// ```rust
    /// use sprout::BeanError;
    ///
    /// let err = BeanError::BeanCreation {
    ///     name: "a".to_owned(),
    ///     message: "can't resolve reference".to_owned(),
    ///     source: Box::new(BeanError::NotFound { name: "b".to_owned() }),
    /// };
    ///
    /// assert!(err.root_cause().is_not_found());
    /// ```
    pub fn root_cause(&self) -> &BeanError {
        let mut current = self;

        while let BeanError::BeanCreation { source, .. } = current {
            current = source;
        }

        current
    }
}

/// Errors raised when turning a resolved property value into a field value.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Literals cannot be converted to this type.
    #[error("literal values cannot be converted to '{type_name}'")]
    Unsupported {
        /// The target type.
        type_name: &'static str,
    },

    /// The literal does not parse as the target integer type.
    #[error("cannot convert literal '{value}' to '{type_name}'")]
    InvalidLiteral {
        /// The literal text.
        value: String,
        /// The target type.
        type_name: &'static str,
        /// The parse failure.
        #[source]
        source: ParseIntError,
    },

    /// A value of one kind was given where another was required.
    #[error("cannot assign {actual} to a property of type '{required}'")]
    Mismatch {
        /// The declared type of the property.
        required: &'static str,
        /// A description of the value given.
        actual: String,
    },

    /// The target bean is still borrowed by someone else.
    #[error("bean of type '{type_name}' is already borrowed")]
    Borrowed {
        /// The type of the bean.
        type_name: &'static str,
    },
}
