use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::{error, info, warn, Level};

use transport_backoffice::config::EnvironmentConfig;
use transport_backoffice::dto::OrdenFilters;
use transport_backoffice::services::{AuthService, OrdenService, ReferenceDataLoader};
use transport_backoffice::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;

    // Configurar logging
    let level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚚 Back-office de transporte");
    info!("================================================");
    info!("🌐 API: {} ({})", config.api_base_url, config.environment);

    let email = std::env::var("BACKOFFICE_EMAIL").context("Falta BACKOFFICE_EMAIL")?;
    let password = std::env::var("BACKOFFICE_PASSWORD").context("Falta BACKOFFICE_PASSWORD")?;

    let ctx = AppContext::new(config)?;
    let auth = AuthService::new(ctx.clone());
    let user = auth.login(&email, &password).await?;
    info!("👤 Sesión de {}", user.nombre.as_deref().unwrap_or(&user.id));

    let ordenes = OrdenService::new(ctx.clone());
    let filters = OrdenFilters {
        pagination: ctx.default_pagination()?,
        ..Default::default()
    };
    match ordenes.list(&filters).await {
        Ok(page) => {
            info!("📦 {} órdenes (página {} de {})", page.total, page.page, page.pages());
            for orden in &page.data {
                println!("{}\t{}\t{}", orden.numero_ot, orden.fecha, orden.estado.as_str());
            }
        }
        Err(e) => error!("❌ {}", e.user_message()),
    }

    let state = ReferenceDataLoader::new(ctx.clone()).load_state().await;
    if !state.can_submit() {
        warn!("⚠️ El formulario de órdenes no puede enviarse: {:?}", state);
    }

    auth.logout().await;
    Ok(())
}
