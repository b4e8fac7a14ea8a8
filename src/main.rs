use std::sync::Arc;

use insurio::config::Config;
use insurio::intake::{ContactForm, FormVariant, IntakePipeline, PartnerForm};
use insurio::notify::HttpMailer;
use insurio::routes;
use insurio::state::AppState;
use insurio::store::CsvFileStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insurio=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    let mailer = Arc::new(HttpMailer::new(
        config.mail_api_url.clone(),
        config.mail_api_key.clone(),
        config.mail_from.clone(),
    ));

    let contact_store = Arc::new(CsvFileStore::new(
        config.data_folder.join(ContactForm::SHEET_FILE),
    )?);
    let partner_store = Arc::new(CsvFileStore::new(
        config.data_folder.join(PartnerForm::SHEET_FILE),
    )?);

    let state = Arc::new(AppState {
        contact: IntakePipeline::new(
            contact_store,
            mailer.clone(),
            config.notification_email.clone(),
        ),
        partner: IntakePipeline::new(partner_store, mailer, config.notification_email.clone()),
        config: config.clone(),
    });

    let app = routes::app(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Insurio intake listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
