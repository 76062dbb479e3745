use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum RegistryErrorKind {
    #[error("Producer already registered for capability `{type_info}`")]
    Duplicate { type_info: TypeInfo },
    #[error("No producer registered for implementation `{type_info}`")]
    MissingImplementation { type_info: TypeInfo },
}
