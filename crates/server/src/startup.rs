use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::http::{HeaderValue, Method};
use axum::Router;
use configs::{AppConfig, CorsConfig, MailConfig};
use migration::MigratorTrait;
use service::mail::{MailSender, NoopMailer, SmtpMailer};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

/// Allowed origins from config; credentials are allowed so request headers
/// are mirrored rather than wildcarded.
pub fn build_cors(cfg: &CorsConfig) -> Result<CorsLayer, StartupError> {
    let origins = cfg
        .allowed_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|_| StartupError::InvalidConfig(format!("bad CORS origin: {}", o)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

pub fn build_mailer(cfg: Option<&MailConfig>) -> Result<Arc<dyn MailSender>, StartupError> {
    match cfg {
        Some(mail) => Ok(Arc::new(SmtpMailer::from_config(mail)?)),
        None => {
            warn!(service = "server", event = "mail_disabled", "no [mail] section or SMTP_HOST; mails are only logged");
            Ok(Arc::new(NoopMailer))
        }
    }
}

/// Connect, migrate and assemble the router for an already validated config.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!(service = "server", event = "migrated");

    let state = AppState::new(db, build_mailer(cfg.mail.as_ref())?);
    Ok(routes::build_router(state, build_cors(&cfg.cors)?))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address: {}", e)))
}

/// Serve until `shutdown` resolves.
pub async fn serve(cfg: AppConfig, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<(), StartupError> {
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    info!(service = "server", event = "listening", %addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(anyhow::Error::from)?;
    Ok(())
}

/// Public entry: load config (file or environment) and run until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_env()?;
    serve(cfg, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_rejects_unparsable_origin() {
        let cfg = CorsConfig { allowed_origins: vec!["http://ok.example".into(), "bad\norigin".into()] };
        assert!(matches!(build_cors(&cfg), Err(StartupError::InvalidConfig(_))));
    }

    #[test]
    fn missing_mail_section_falls_back_to_logging() {
        assert!(build_mailer(None).is_ok());
    }
}
