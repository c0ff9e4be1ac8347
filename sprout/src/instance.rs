use std::{
    any::{self, Any, TypeId},
    cell::RefCell,
    fmt,
    rc::Rc,
};

/// A shared handle to a bean created by the container.
///
/// Every bean lives in an `Rc<RefCell<T>>`. `BeanInstance` erases `T` so that
/// beans of different types can sit in the same cache; use [`downcast`](BeanInstance::downcast)
/// to get the typed handle back.
#[derive(Clone)]
pub struct BeanInstance {
    type_name: &'static str,
    type_id: TypeId,
    origin: Rc<dyn Any>,
}

impl BeanInstance {
    /// Wraps a value into a new bean instance.
    pub fn new<T: 'static>(value: T) -> Self {
        Self::from_rc(Rc::new(RefCell::new(value)))
    }

    /// Wraps an existing shared value.
    pub fn from_rc<T: 'static>(value: Rc<RefCell<T>>) -> Self {
        Self {
            type_name: any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            origin: value,
        }
    }

    /// Returns the name of the type of the bean.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the [`TypeId`] of the type of the bean.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns whether the bean is of type `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Returns the typed handle, or `None` if the bean is not a `T`.
    pub fn downcast<T: 'static>(&self) -> Option<Rc<RefCell<T>>> {
        self.origin.clone().downcast::<RefCell<T>>().ok()
    }

    /// Returns whether both handles point to the same bean.
    pub fn ptr_eq(&self, other: &BeanInstance) -> bool {
        Rc::ptr_eq(&self.origin, &other.origin)
    }

    pub(crate) fn as_any(&self) -> &dyn Any {
        &*self.origin
    }
}

impl fmt::Debug for BeanInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanInstance")
            .field("type_name", &self.type_name)
            .field("ptr", &Rc::as_ptr(&self.origin))
            .finish()
    }
}
