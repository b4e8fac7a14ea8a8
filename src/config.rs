use std::path::PathBuf;

#[derive(Clone)]
pub struct Config {
    pub notification_email: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
    pub data_folder: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let notification_email = std::env::var("NOTIFICATION_EMAIL")
            .map_err(|_| "NOTIFICATION_EMAIL must be set")?;

        let mail_api_url = std::env::var("MAIL_API_URL")
            .unwrap_or_else(|_| "https://api.resend.com/emails".to_string());

        let mail_api_key = std::env::var("MAIL_API_KEY")
            .map_err(|_| "MAIL_API_KEY must be set")?;

        let mail_from = std::env::var("MAIL_FROM")
            .unwrap_or_else(|_| "Insurio Forms <forms@insurio.ca>".to_string());

        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let data_folder = base_dir.join(
            std::env::var("DATA_FOLDER").unwrap_or_else(|_| "data".to_string())
        );

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5001".to_string())
            .parse()
            .unwrap_or(5001);

        Ok(Self {
            notification_email,
            mail_api_url,
            mail_api_key,
            mail_from,
            data_folder,
            host,
            port,
        })
    }
}
