use serde::{Deserialize, Serialize};

const DIRECT_CONNECT_PREFIX: &str = "ofxhome:";

/// An institution driver as listed by the account search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Driver {
    #[serde(rename = "ID")]
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub display_name: String,
}

impl Driver {
    pub fn is_direct_connect(&self) -> bool {
        self.id.starts_with(DIRECT_CONNECT_PREFIX)
    }
}

/// OFX direct-connect institution settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirectConnectConfig {
    pub description: String,
    #[serde(rename = "FID")]
    pub fid: String,
    pub org: String,
    #[serde(rename = "URL")]
    pub url: String,
    pub username: String,
    #[serde(default, rename = "ClientID")]
    pub client_id: String,
    #[serde(rename = "AppID")]
    pub app_id: String,
    pub app_version: String,
    #[serde(rename = "OFXVersion")]
    pub ofx_version: String,
}

impl DirectConnectConfig {
    /// Names of required fields that are still blank. `ClientID` is optional.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("Description", &self.description),
            ("FID", &self.fid),
            ("Org", &self.org),
            ("URL", &self.url),
            ("Username", &self.username),
            ("AppID", &self.app_id),
            ("AppVersion", &self.app_version),
            ("OFXVersion", &self.ofx_version),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Browser-automation institution settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebConnectConfig {
    pub driver: String,
    pub username: String,
}

/// Which editor an account uses, known only once its driver has loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AccountEditor {
    #[default]
    Uninitialized,
    DirectConnect(DirectConnectConfig),
    WebConnect(WebConnectConfig),
}

impl AccountEditor {
    /// Chooses the editor variant from the loaded driver. An editor that is
    /// already initialized keeps its variant.
    pub fn load(self, driver: &Driver) -> Self {
        match self {
            AccountEditor::Uninitialized if driver.is_direct_connect() => {
                AccountEditor::DirectConnect(DirectConnectConfig {
                    description: driver.description.clone(),
                    ..DirectConnectConfig::default()
                })
            }
            AccountEditor::Uninitialized => AccountEditor::WebConnect(WebConnectConfig {
                driver: driver.id.clone(),
                username: String::new(),
            }),
            initialized => initialized,
        }
    }

    pub fn title(&self) -> Option<&'static str> {
        match self {
            AccountEditor::Uninitialized => None,
            AccountEditor::DirectConnect(_) => Some("Direct Connect"),
            AccountEditor::WebConnect(_) => Some("Web Connect (beta)"),
        }
    }
}
