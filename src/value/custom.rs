//! Type-erased wrapper for caller-defined values.
//!
//! A `CustomValue` carries its own type identifier, so the codec can look
//! up the matching converter in the registry without knowing the concrete
//! type. Converters downcast through `as_any` to reach the payload.

use std::{any::Any, fmt};

/// A caller-defined value the codec can serialize once a converter for its
/// type identifier is registered.
pub trait CustomObject: fmt::Debug + Send + Sync + 'static {
    /// Stable type identifier used for registry lookup and the wire marker.
    fn type_id(&self) -> &str;

    fn clone_box(&self) -> Box<dyn CustomObject>;

    fn as_any(&self) -> &dyn Any;
}

/// Boxed, clonable holder for a [`CustomObject`].
pub struct CustomValue(Box<dyn CustomObject>);

impl CustomValue {
    pub fn new(obj: impl CustomObject) -> Self {
        Self(Box::new(obj))
    }

    pub fn type_id(&self) -> &str {
        // Qualified call: `Any::type_id` is also in scope and would
        // otherwise resolve on the `Box` itself.
        CustomObject::type_id(self.0.as_ref())
    }

    /// Downcasts to the concrete type, if it matches.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl Clone for CustomValue {
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
