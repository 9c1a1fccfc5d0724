//! Store Info Model

use serde::{Deserialize, Serialize};

/// Issuer details printed on invoices
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl StoreInfo {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }
}
