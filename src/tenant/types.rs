//! Tenant, branding and third-party integration model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub support_email: Option<String>,
    #[serde(default)]
    pub support_phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub branding: Branding,
}

/// Kind of external service an API config connects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    Sms,
    Email,
    Kyc,
    CreditBureau,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Sms,
        ServiceType::Email,
        ServiceType::Kyc,
        ServiceType::CreditBureau,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Sms => "SMS",
            ServiceType::Email => "EMAIL",
            ServiceType::Kyc => "KYC",
            ServiceType::CreditBureau => "CREDIT_BUREAU",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::Sms => "SMS",
            ServiceType::Email => "Correo electrónico",
            ServiceType::Kyc => "Verificación de identidad (KYC)",
            ServiceType::CreditBureau => "Buró de crédito",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown service type: {}", s))
    }
}

/// Stored integration settings for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub id: u64,
    pub tenant_id: u64,
    pub service_type: ServiceType,
    pub provider: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_sandbox: bool,
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

/// Create/update body for an API config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfigRequest {
    pub service_type: ServiceType,
    pub provider: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_sandbox: bool,
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

impl ApiConfigRequest {
    pub fn into_config(self, id: u64, tenant_id: u64) -> ApiConfig {
        ApiConfig {
            id,
            tenant_id,
            service_type: self.service_type,
            provider: self.provider,
            is_active: self.is_active,
            is_sandbox: self.is_sandbox,
            credentials: self.credentials,
            settings: self.settings,
        }
    }
}
