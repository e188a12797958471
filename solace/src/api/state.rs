use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::generation::GeneratorProvider;
use crate::sentiment::SentimentClassifier;
use crate::services::{AuthService, ConversationService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub generator: GeneratorProvider,
    pub auth: AuthService,
    pub conversation: ConversationService,
}

impl AppState {
    pub fn new(
        config: Config,
        db: Database,
        classifier: SentimentClassifier,
        generator: GeneratorProvider,
    ) -> Self {
        let config = Arc::new(config);
        let auth = AuthService::new(db.clone(), &config.auth);
        let conversation = ConversationService::new(db.clone(), classifier, generator.clone());

        Self {
            config,
            db,
            generator,
            auth,
            conversation,
        }
    }
}
