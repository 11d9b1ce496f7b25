use clap::Parser;
use eframe::egui;
use policy_chat::app::ChatApp;
use policy_chat::backend::{HttpBackend, ReplyDispatcher};
use policy_chat::config::Config;
use policy_chat::logging::init_logging;
use policy_chat::session::store::FileStorage;
use std::sync::{mpsc, Arc};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_logging(&config.log_level);

    let storage = FileStorage::new(config.store_path());
    let backend = HttpBackend::new(config.endpoint.clone(), config.request_timeout())?;
    info!(
        endpoint = backend.endpoint(),
        store = %storage.path().display(),
        "starting policy-chat"
    );

    let (tx, rx) = mpsc::channel();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("policy-chat-runtime")
        .build()?;
    let dispatcher = ReplyDispatcher::new(Arc::new(backend), runtime.handle().clone(), tx);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "HR Policy Assistant",
        native_options,
        Box::new(move |creation_context| {
            Ok(Box::new(ChatApp::new(creation_context, rx, dispatcher, storage)))
        }),
    )?;

    Ok(())
}
