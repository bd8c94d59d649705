//! Notification template system.
//!
//! This module provides:
//! - Template model and channel/event config ([`types`])
//! - `{{namespace.field}}` interpolation ([`interpolation`])
//! - Sample-data previews and HTML-to-text rendering ([`preview`])
//! - Non-blocking shape advisories ([`advisory`])
//! - The suggested-template catalog and its provisioner
//! - A local cache of the backend's templates ([`TemplateStore`])
//!
//! # Example
//!
//! ```ignore
//! let store = TemplateStore::new(backend.clone());
//! store.refresh().await?;
//!
//! for template in store.filter(&TemplateFilter { channel: Some(Channel::Sms), ..Default::default() }) {
//!     println!("{}: {}", template.name, card_preview(&template, 180));
//! }
//!
//! let report = TemplateProvisioner::new(backend).provision(ProvisionMode::Replace).await;
//! ```

pub mod advisory;
pub mod catalog;
pub mod interpolation;
pub mod preview;
pub mod provisioner;
pub mod sample;
pub mod store;
pub mod types;

pub use advisory::{advisories, Advisory};
pub use catalog::{default_config, suggested_templates};
pub use interpolation::{interpolate, placeholders, unknown_placeholders, variables_from_json, Variables};
pub use preview::{card_preview, full_preview, render_preview, strip_html, FullPreview};
pub use provisioner::{ProvisionMode, ProvisionReport, TemplateProvisioner};
pub use sample::sample_variables;
pub use store::{DeleteManyResult, TemplateFilter, TemplateStore};
pub use types::{
    Channel, ChannelOption, CreateTemplateRequest, EventOption, NotificationTemplate,
    TemplateConfig, TemplateContent, TemplateError, TemplateResult, UpdateTemplateRequest,
};
