use serde::{Deserialize, Serialize};

/// Scorer backing the analysis. Only the built-in keyword scorer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelProvider {
    #[default]
    KeywordScorer,
}

impl ModelProvider {
    pub const fn label(self) -> &'static str {
        match self {
            ModelProvider::KeywordScorer => "Keyword scorer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZoomCredentials {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ZoomCredentials {
    pub fn is_complete(&self) -> bool {
        [&self.account_id, &self.client_id, &self.client_secret]
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmailCredentials {
    pub sender: String,
    pub app_password: String,
}

impl EmailCredentials {
    pub fn is_complete(&self) -> bool {
        !self.sender.trim().is_empty() && !self.app_password.trim().is_empty()
    }
}

/// Recruiter-supplied configuration. Lives in the session only; never written
/// to disk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecruiterSettings {
    pub model_provider: ModelProvider,
    pub api_key: Option<String>,
    pub zoom: ZoomCredentials,
    pub email: EmailCredentials,
    pub company_name: String,
}

impl RecruiterSettings {
    pub fn with_company_name(company_name: Option<String>) -> Self {
        Self {
            company_name: company_name.unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Human-readable names of every required field that is still blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("Zoom Account ID", &self.zoom.account_id),
            ("Zoom Client ID", &self.zoom.client_id),
            ("Zoom Client Secret", &self.zoom.client_secret),
            ("Email Sender", &self.email.sender),
            ("Email Password", &self.email.app_password),
            ("Company Name", &self.company_name),
        ];

        required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(label, _)| label)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Applies a patch. Blank values are ignored so a partially filled form
    /// never erases what was entered earlier.
    pub fn apply(&mut self, patch: SettingsPatch) {
        fn merge(target: &mut String, value: Option<String>) {
            if let Some(value) = value.map(|v| v.trim().to_string()) {
                if !value.is_empty() {
                    *target = value;
                }
            }
        }

        if let Some(provider) = patch.model_provider {
            self.model_provider = provider;
        }
        if let Some(api_key) = patch.api_key.filter(|key| !key.trim().is_empty()) {
            self.api_key = Some(api_key);
        }
        merge(&mut self.zoom.account_id, patch.zoom_account_id);
        merge(&mut self.zoom.client_id, patch.zoom_client_id);
        merge(&mut self.zoom.client_secret, patch.zoom_client_secret);
        merge(&mut self.email.sender, patch.email_sender);
        merge(&mut self.email.app_password, patch.email_app_password);
        merge(&mut self.company_name, patch.company_name);
    }

    /// Drops credentials and company details. The provider selection and API
    /// key survive.
    pub fn clear_credentials(&mut self) {
        *self = Self {
            model_provider: self.model_provider,
            api_key: self.api_key.take(),
            ..Self::default()
        };
    }

    pub fn view(&self) -> SettingsView {
        SettingsView {
            model_provider: self.model_provider,
            model_provider_label: self.model_provider.label(),
            zoom_configured: self.zoom.is_complete(),
            email_sender: self.email.sender.clone(),
            email_configured: self.email.is_complete(),
            company_name: self.company_name.clone(),
            missing: self.missing_fields(),
        }
    }
}

/// Partial update of the recruiter settings form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    #[serde(default)]
    pub model_provider: Option<ModelProvider>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub zoom_account_id: Option<String>,
    #[serde(default)]
    pub zoom_client_id: Option<String>,
    #[serde(default)]
    pub zoom_client_secret: Option<String>,
    #[serde(default)]
    pub email_sender: Option<String>,
    #[serde(default)]
    pub email_app_password: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

/// Settings as exposed over the API: secrets are reduced to flags.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    pub model_provider: ModelProvider,
    pub model_provider_label: &'static str,
    pub zoom_configured: bool,
    pub email_sender: String,
    pub email_configured: bool,
    pub company_name: String,
    pub missing: Vec<&'static str>,
}
