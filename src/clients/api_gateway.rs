//! Cliente HTTP para la API REST del back-office
//!
//! Todas las llamadas llevan `Authorization: Bearer <token>` salvo las de
//! `/auth/*`. Un 401 cierra la sesión antes de devolver el error.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::state::SessionContext;
use crate::utils::errors::{AppError, AppResult};

/// Gateway de la API REST
#[derive(Clone)]
pub struct ApiGateway {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl ApiGateway {
    /// Crear nuevo gateway con URL base configurable
    pub fn new(base_url: &str, timeout: Duration, session: SessionContext) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.send_json(Method::GET, path, None::<&()>).await
    }

    /// GET con query string ya construido (sin `?`)
    pub async fn get_with_query<T: DeserializeOwned>(&self, path: &str, query: &str) -> AppResult<T> {
        if query.is_empty() {
            self.get(path).await
        } else {
            self.get(&format!("{}?{}", path, query)).await
        }
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        self.send_json(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        self.send_json(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.send_json(Method::DELETE, path, None::<&()>).await
    }

    /// DELETE / POST sin body de respuesta (204)
    pub async fn send_no_content<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> AppResult<()> {
        let request = self.authorized(method, path, body).await?;
        self.execute(request).await.map(|_| ())
    }

    /// POST a endpoints públicos (`/auth/*`), sin token
    pub async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        debug!("🌐 POST {} (público)", path);
        let request = self.client.post(self.build_url(path)).json(body);
        let response = self.execute(request).await?;
        decode_body(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> AppResult<T> {
        let request = self.authorized(method, path, body).await?;
        let response = self.execute(request).await?;
        decode_body(response).await
    }

    /// Preparar un request autenticado; sin sesión no hay I/O
    async fn authorized<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> AppResult<RequestBuilder> {
        let session = self.session.current().await.ok_or(AppError::SessionMissing)?;
        debug!("🌐 {} {}", method, path);

        let mut request = self
            .client
            .request(method, self.build_url(path))
            .bearer_auth(&session.token)
            .header("X-Tenant-Id", &session.tenant_id)
            .header("Accept", "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request)
    }

    async fn execute(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request.send().await.map_err(|e| {
            error!("❌ Error de red: {}", e);
            AppError::Network(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let app_error = AppError::from_response(status, &body);

        if let AppError::Unauthorized(_) = app_error {
            warn!("⚠️ 401 recibido, cerrando sesión");
            self.session.clear().await;
        } else {
            error!("❌ API respondió {}: {}", status, app_error.user_message());
        }

        Err(app_error)
    }
}

/// Deserializar el body; un body vacío se interpreta como `null`
async fn decode_body<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}
