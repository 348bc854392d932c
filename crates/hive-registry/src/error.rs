//! Registry error types

use thiserror::Error;

use crate::key::{ServiceId, TypeKey};

/// Errors that can occur during registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Service already registered: {type_name} (id {id})")]
    DuplicateService { type_name: String, id: ServiceId },

    #[error("Factory already registered: {type_name}")]
    DuplicateFactory { type_name: String },

    #[error("Factory not registered: {type_name}")]
    FactoryNotFound { type_name: String },

    #[error("Service not registered: {type_name} (id {id})")]
    ServiceNotFound { type_name: String, id: ServiceId },

    #[error("Type mismatch for {type_name}: {message}")]
    TypeMismatch { type_name: String, message: String },
}

impl RegistryError {
    pub(crate) fn duplicate_service(key: TypeKey, id: ServiceId) -> Self {
        Self::DuplicateService {
            type_name: key.name().to_string(),
            id,
        }
    }

    pub(crate) fn duplicate_factory(key: TypeKey) -> Self {
        Self::DuplicateFactory {
            type_name: key.name().to_string(),
        }
    }

    pub(crate) fn factory_not_found(key: TypeKey) -> Self {
        Self::FactoryNotFound {
            type_name: key.name().to_string(),
        }
    }

    pub(crate) fn service_not_found(key: TypeKey, id: ServiceId) -> Self {
        Self::ServiceNotFound {
            type_name: key.name().to_string(),
            id,
        }
    }

    pub(crate) fn type_mismatch(key: TypeKey, message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            type_name: key.name().to_string(),
            message: message.into(),
        }
    }

    /// True for `ServiceNotFound` and `FactoryNotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ServiceNotFound { .. } | Self::FactoryNotFound { .. }
        )
    }

    /// True for `DuplicateService` and `DuplicateFactory`
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicateService { .. } | Self::DuplicateFactory { .. }
        )
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
