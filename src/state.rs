use crate::config::Config;
use crate::intake::{ContactForm, IntakePipeline, PartnerForm};
use std::sync::Arc;

pub struct AppState {
    pub contact: IntakePipeline<ContactForm>,
    pub partner: IntakePipeline<PartnerForm>,
    pub config: Arc<Config>,
}
