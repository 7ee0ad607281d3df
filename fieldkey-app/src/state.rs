//! Host state: the assembled core plus the settings it was built from.

use std::path::PathBuf;
use std::sync::Arc;

use fieldkey_core::exec::locksmith::locksmith_handlers;
use fieldkey_core::tools::catalog;
use fieldkey_core::{
    CommandModel, Dispatcher, FieldAssistant, HistoryLog, ModelHandle, ModelSlot, StubModel,
    ToolExecutor, Transcriber,
};
use tracing::info;

use crate::router::create_router;
use crate::settings::AppSettings;

pub struct AppState {
    pub assistant: FieldAssistant,
    pub slot: Arc<ModelSlot>,
    pub settings: AppSettings,
    pub settings_path: PathBuf,
}

impl AppState {
    pub fn new(settings: AppSettings, settings_path: PathBuf) -> Self {
        let mut dispatcher = Dispatcher::new(settings.dispatcher_config());
        if let Some(router) = create_router(&settings) {
            dispatcher = dispatcher.with_router(router);
        }

        let history = match settings.history_capacity {
            0 => HistoryLog::unbounded(),
            n => HistoryLog::with_capacity(n),
        };
        let executor = ToolExecutor::new(locksmith_handlers(), history);

        let slot = Arc::new(model_slot(&settings));
        let transcriber = Transcriber::new(Arc::clone(&slot), settings.transcriber_config());

        info!(
            backend = %settings.model_backend,
            router = dispatcher.router_name().unwrap_or("none"),
            "field assistant assembled"
        );

        let assistant = FieldAssistant::new(
            Arc::new(dispatcher),
            Arc::new(executor),
            Arc::new(transcriber),
            catalog::locksmith_tools(),
        );
        Self {
            assistant,
            slot,
            settings,
            settings_path,
        }
    }
}

fn model_slot(settings: &AppSettings) -> ModelSlot {
    match settings.model_backend.as_str() {
        "whisper-cli" => {
            let config = settings.whisper_config();
            ModelSlot::new(move || Ok(ModelHandle::new(CommandModel::new(config.clone()))))
        }
        _ => {
            let transcript = settings.stub_transcript.clone();
            ModelSlot::new(move || {
                let model = if transcript.is_empty() {
                    StubModel::default()
                } else {
                    StubModel::new(transcript.clone())
                };
                Ok(ModelHandle::new(model))
            })
        }
    }
}
