//! Estado compartido de la aplicación
//!
//! Este módulo define la sesión autenticada y el contexto de aplicación que
//! se pasa explícitamente a los servicios. La sesión se inicia en el login y
//! se destruye en el logout o ante un 401 de la API.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::cache::ResponseCache;
use crate::clients::ApiGateway;
use crate::config::EnvironmentConfig;
use crate::dto::Pagination;
use crate::queries::Debouncer;
use crate::utils::errors::{AppError, AppResult};

/// Usuario autenticado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: Option<String>,
    pub nombre: Option<String>,
    pub rol: Option<String>,
}

/// Claims que emite la API en el token de acceso
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionClaims {
    sub: String,
    tenant_id: Option<String>,
    email: Option<String>,
    nombre: Option<String>,
    rol: Option<String>,
    exp: Option<i64>,
}

/// Sesión autenticada contra la API
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub tenant_id: String,
    pub user: SessionUser,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Construir la sesión leyendo los claims del JWT.
    /// La firma la verifica la API; aquí sólo se leen tenant y expiración.
    pub fn from_token(token: &str) -> AppResult<Self> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        let data = decode::<SessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| AppError::Unauthorized(format!("Token inválido: {}", e)))?;
        let claims = data.claims;

        let tenant_id = claims
            .tenant_id
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Unauthorized("El token no contiene tenant".to_string()))?;

        Ok(Self {
            token: token.to_string(),
            tenant_id,
            user: SessionUser {
                id: claims.sub,
                email: claims.email,
                nombre: claims.nombre,
                rol: claims.rol,
            },
            expires_at: claims.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single()),
        })
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| Utc::now() >= exp).unwrap_or(false)
    }
}

/// Contenedor de la sesión activa, compartido entre gateway y servicios
#[derive(Clone, Default)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iniciar sesión (login)
    pub async fn begin(&self, session: Session) {
        info!("🔐 Sesión iniciada para usuario '{}' (tenant: {})", session.user.id, session.tenant_id);
        *self.current.write().await = Some(session);
    }

    /// Cerrar sesión (logout o 401)
    pub async fn clear(&self) {
        let previous = self.current.write().await.take();
        if let Some(session) = previous {
            warn!("🚪 Sesión cerrada para usuario '{}'", session.user.id);
        }
    }

    /// Sesión vigente; una sesión expirada se trata como ausente
    pub async fn current(&self) -> Option<Session> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|s| !s.is_expired())
            .cloned()
    }

    pub async fn token(&self) -> AppResult<String> {
        self.current().await.map(|s| s.token).ok_or(AppError::SessionMissing)
    }

    pub async fn tenant_id(&self) -> AppResult<String> {
        self.current().await.map(|s| s.tenant_id).ok_or(AppError::SessionMissing)
    }

    pub async fn is_active(&self) -> bool {
        self.current().await.is_some()
    }
}

/// Contexto de aplicación: lo que cada servicio necesita para trabajar
#[derive(Clone)]
pub struct AppContext {
    pub config: EnvironmentConfig,
    pub session: SessionContext,
    pub gateway: ApiGateway,
    pub cache: ResponseCache,
}

impl AppContext {
    pub fn new(config: EnvironmentConfig) -> AppResult<Self> {
        let session = SessionContext::new();
        let gateway = ApiGateway::new(&config.api_base_url, config.request_timeout, session.clone())?;
        let cache = ResponseCache::new(&config.cache);

        Ok(Self {
            config,
            session,
            gateway,
            cache,
        })
    }

    /// Tenant de la sesión activa
    pub async fn tenant_id(&self) -> AppResult<String> {
        self.session.tenant_id().await
    }

    /// Debouncer de búsqueda con el retardo configurado
    pub fn search_debouncer(&self) -> Debouncer {
        Debouncer::new(self.config.search_debounce)
    }

    /// Paginación inicial de los listados
    pub fn default_pagination(&self) -> AppResult<Pagination> {
        Pagination::with_limit(self.config.default_page_size)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    pub(crate) fn make_token(tenant: Option<&str>, exp: i64) -> String {
        let mut claims = json!({
            "sub": "u-1",
            "email": "ana@transportes.cl",
            "nombre": "Ana",
            "rol": "ADMIN",
            "exp": exp,
        });
        if let Some(tenant) = tenant {
            claims["tenantId"] = json!(tenant);
        }
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secreto")).unwrap()
    }

    #[test]
    fn test_session_from_token() {
        let exp = (Utc::now() + chrono::Duration::hours(1)).timestamp();
        let session = Session::from_token(&make_token(Some("t1"), exp)).unwrap();
        assert_eq!(session.tenant_id, "t1");
        assert_eq!(session.user.id, "u-1");
        assert_eq!(session.user.rol.as_deref(), Some("ADMIN"));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_token_without_tenant_is_rejected() {
        let exp = (Utc::now() + chrono::Duration::hours(1)).timestamp();
        let result = Session::from_token(&make_token(None, exp));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(Session::from_token("no-es-un-jwt").is_err());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let context = SessionContext::new();
        assert!(matches!(context.token().await, Err(AppError::SessionMissing)));

        let exp = (Utc::now() + chrono::Duration::hours(1)).timestamp();
        context.begin(Session::from_token(&make_token(Some("t1"), exp)).unwrap()).await;
        assert_eq!(context.tenant_id().await.unwrap(), "t1");

        context.clear().await;
        assert!(!context.is_active().await);
    }

    #[tokio::test]
    async fn test_expired_session_is_absent() {
        let context = SessionContext::new();
        let exp = (Utc::now() - chrono::Duration::minutes(5)).timestamp();
        context.begin(Session::from_token(&make_token(Some("t1"), exp)).unwrap()).await;
        assert!(context.current().await.is_none());
    }

    #[test]
    fn test_context_uses_configured_defaults() {
        let ctx = AppContext::new(EnvironmentConfig::default()).unwrap();
        assert_eq!(ctx.default_pagination().unwrap().limit(), 10);
        assert_eq!(ctx.search_debouncer().delay(), std::time::Duration::from_millis(400));
    }
}
