//! Credenciales y selección determinista del par primario/alternativo.

use pulse_core::AppError;
use tracing::warn;

use crate::provider::ProviderId;

/// Credenciales configuradas. Cadenas vacías equivalen a ausencia.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub primary_api_key: Option<String>,
    pub secondary_api_key: Option<String>,
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
         .field("primary_api_key", &self.primary_api_key.as_ref().map(|_| "***"))
         .field("secondary_api_key", &self.secondary_api_key.as_ref().map(|_| "***"))
         .finish()
    }
}

impl ProviderCredentials {
    pub fn new(primary: Option<String>, secondary: Option<String>) -> Self {
        Self { primary_api_key: normalize(primary),
               secondary_api_key: normalize(secondary) }
    }

    pub fn primary(&self) -> Option<&str> {
        self.primary_api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn secondary(&self) -> Option<&str> {
        self.secondary_api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

fn normalize(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

/// Un proveedor concreto junto con la credencial con la que se usará.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderRoute {
    pub id: ProviderId,
    pub api_key: String,
}

impl std::fmt::Debug for ProviderRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRoute").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Par primario / alternativo elegido a partir de las credenciales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSelection {
    pub primary: ProviderRoute,
    pub fallback: Option<ProviderRoute>,
}

impl ProviderSelection {
    /// Reglas:
    /// - sin credencial primaria: `AUTH_ERROR`, sin actividad de red;
    /// - credencial primaria con formato de la secundaria (`gsk_`): se usa la
    ///   familia secundaria como primaria y no hay alternativa;
    /// - en otro caso la familia primaria, con la secundaria como alternativa
    ///   si su credencial existe.
    pub fn from_credentials(credentials: &ProviderCredentials) -> Result<Self, AppError> {
        let primary_key = credentials.primary().ok_or_else(|| {
                                                   AppError::auth("primary provider credential is not configured")
                                                       .with_docs("set OPENAI_API_KEY (and optionally GROQ_API_KEY for fallback)")
                                               })?;

        if primary_key.starts_with(ProviderId::Groq.key_prefix()) {
            warn!("primary credential has the secondary provider's key format; using groq without fallback");
            return Ok(Self { primary: ProviderRoute { id: ProviderId::Groq,
                                                      api_key: primary_key.to_string() },
                             fallback: None });
        }

        if !primary_key.starts_with(ProviderId::OpenAi.key_prefix()) {
            warn!(expected_prefix = ProviderId::OpenAi.key_prefix(),
                  "primary credential does not match the expected prefix; accepting it anyway");
        }

        let fallback = credentials.secondary().map(|key| ProviderRoute { id: ProviderId::Groq,
                                                                         api_key: key.to_string() });
        Ok(Self { primary: ProviderRoute { id: ProviderId::OpenAi,
                                           api_key: primary_key.to_string() },
                  fallback })
    }
}
