//! Tenants, branding and third-party API configs.

pub mod branding;
pub mod providers;
pub mod types;

pub use branding::validate_branding;
pub use providers::{
    is_masked, mask_secret, mask_secrets, provider, provider_fields, providers, providers_for,
    restore_masked_secrets, validate_api_config, FieldKind, FieldSpec, ProviderSpec, MASK,
};
pub use types::{ApiConfig, ApiConfigRequest, Branding, ServiceType, Tenant};
