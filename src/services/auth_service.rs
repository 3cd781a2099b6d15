//! Servicio de autenticación
//!
//! Login contra `/auth/login` (endpoint público) y apertura de la sesión
//! con el tenant del token. El logout vacía sesión y cache.

use tracing::{info, warn};

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::state::{AppContext, Session, SessionUser};
use crate::utils::errors::{form_error, AppResult};
use crate::utils::validation::validate_not_empty;

/// Servicio de autenticación
#[derive(Clone)]
pub struct AuthService {
    ctx: AppContext,
}

impl AuthService {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Autenticar e iniciar sesión
    pub async fn login(&self, email: &str, password: &str) -> AppResult<SessionUser> {
        validate_not_empty(email).map_err(|_| form_error("El email es obligatorio"))?;
        validate_not_empty(password).map_err(|_| form_error("La contraseña es obligatoria"))?;

        info!("🔐 Login para {}", email.trim());
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.ctx.gateway.post_public("/auth/login", &request).await?;

        let session = Session::from_token(&response.access_token)?;
        let user = session.user.clone();

        // Datos cacheados de otra sesión no deben verse en la nueva
        self.ctx.cache.clear().await;
        self.ctx.session.begin(session).await;

        info!("✅ Login exitoso: {}", user.id);
        Ok(user)
    }

    /// Cerrar sesión y descartar todo lo cacheado
    pub async fn logout(&self) {
        if !self.ctx.session.is_active().await {
            warn!("⚠️ Logout sin sesión activa");
        }
        self.ctx.session.clear().await;
        self.ctx.cache.clear().await;
    }

    pub async fn current_user(&self) -> Option<SessionUser> {
        self.ctx.session.current().await.map(|s| s.user)
    }
}
