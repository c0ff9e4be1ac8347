use std::{any, borrow::Cow, cell::RefCell, rc::Rc};

use crate::{BeanInstance, ConversionError};

/// A property value after the container resolved references and inner beans.
#[derive(Clone, Debug)]
pub enum ResolvedValue {
    /// Literal text, not yet converted.
    Literal(Cow<'static, str>),
    /// A bean, either referenced by name or created from an inner definition.
    Bean(BeanInstance),
}

impl ResolvedValue {
    fn describe(&self) -> String {
        match self {
            ResolvedValue::Literal(text) => format!("literal '{}'", text),
            ResolvedValue::Bean(bean) => format!("bean of type '{}'", bean.type_name()),
        }
    }

    fn mismatch<T>(&self) -> ConversionError {
        ConversionError::Mismatch {
            required: any::type_name::<T>(),
            actual: self.describe(),
        }
    }
}

/// Conversion from a [`ResolvedValue`] into the declared type of a property.
///
/// Integers parse the literal text and strings take it as it is. References
/// to other beans are accepted as `Rc<RefCell<T>>` or as a [`BeanInstance`].
/// Literals are only ever converted to integers and strings: `bool`, `char`,
/// the float types and the bean handles report [`ConversionError::Unsupported`]
/// for a literal.
pub trait FromPropertyValue: Sized + 'static {
    /// Converts the value.
    fn from_property_value(value: ResolvedValue) -> Result<Self, ConversionError>;
}

macro_rules! impl_for_integers {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromPropertyValue for $ty {
                fn from_property_value(value: ResolvedValue) -> Result<Self, ConversionError> {
                    match value {
                        ResolvedValue::Literal(text) => {
                            text.trim().parse::<$ty>().map_err(|source| ConversionError::InvalidLiteral {
                                value: text.into_owned(),
                                type_name: any::type_name::<$ty>(),
                                source,
                            })
                        }
                        bean => Err(bean.mismatch::<$ty>()),
                    }
                }
            }
        )*
    };
}

impl_for_integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_unsupported {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromPropertyValue for $ty {
                fn from_property_value(_: ResolvedValue) -> Result<Self, ConversionError> {
                    Err(ConversionError::Unsupported {
                        type_name: any::type_name::<$ty>(),
                    })
                }
            }
        )*
    };
}

impl_unsupported!(bool, char, f32, f64);

impl FromPropertyValue for String {
    fn from_property_value(value: ResolvedValue) -> Result<Self, ConversionError> {
        match value {
            ResolvedValue::Literal(text) => Ok(text.into_owned()),
            bean => Err(bean.mismatch::<String>()),
        }
    }
}

impl FromPropertyValue for Cow<'static, str> {
    fn from_property_value(value: ResolvedValue) -> Result<Self, ConversionError> {
        match value {
            ResolvedValue::Literal(text) => Ok(text),
            bean => Err(bean.mismatch::<Cow<'static, str>>()),
        }
    }
}

impl FromPropertyValue for BeanInstance {
    fn from_property_value(value: ResolvedValue) -> Result<Self, ConversionError> {
        match value {
            ResolvedValue::Bean(bean) => Ok(bean),
            ResolvedValue::Literal(_) => Err(ConversionError::Unsupported {
                type_name: any::type_name::<BeanInstance>(),
            }),
        }
    }
}

impl<T: 'static> FromPropertyValue for Rc<RefCell<T>> {
    fn from_property_value(value: ResolvedValue) -> Result<Self, ConversionError> {
        match &value {
            ResolvedValue::Bean(bean) => bean.downcast::<T>().ok_or_else(|| value.mismatch::<T>()),
            ResolvedValue::Literal(_) => Err(ConversionError::Unsupported {
                type_name: any::type_name::<Rc<RefCell<T>>>(),
            }),
        }
    }
}

impl<T: FromPropertyValue> FromPropertyValue for Option<T> {
    fn from_property_value(value: ResolvedValue) -> Result<Self, ConversionError> {
        T::from_property_value(value).map(Some)
    }
}
