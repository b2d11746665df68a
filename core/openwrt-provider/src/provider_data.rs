use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// Opaque value produced by provider configuration and handed to every
/// data source's `configure`.
///
/// Keeps the concrete type name so a mismatch can be reported as
/// "expected X, got Y".
#[derive(Clone)]
pub struct ProviderData {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl ProviderData {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: type_name::<T>(),
            value: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for ProviderData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderData")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
