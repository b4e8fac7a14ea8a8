use std::sync::OnceLock;
use tera::Tera;

pub const CONTACT_EMAIL: &str = "contact_email.txt";
pub const PARTNER_EMAIL: &str = "partner_email.txt";

static TERA: OnceLock<Tera> = OnceLock::new();

/// Notification bodies are embedded at compile time so the binary has no
/// runtime template directory to misplace.
pub fn get_tera() -> &'static Tera {
    TERA.get_or_init(|| {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (CONTACT_EMAIL, include_str!("../templates/contact_email.txt")),
            (PARTNER_EMAIL, include_str!("../templates/partner_email.txt")),
        ])
        .expect("Failed to load email templates");
        tera
    })
}
