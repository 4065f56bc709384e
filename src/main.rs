use std::sync::Arc;

use persona_chat::{
    app::App,
    config::Credentials,
    logging,
    settings::{Settings, get_data_dir},
    OpenAIChatModel, PipelineConfig, TurnPipeline, WebRetriever,
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Fail before touching the terminal so the message stays readable.
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let settings = Settings::load();
    // Running without a log file beats not running at all.
    if let Some(data_dir) = get_data_dir() {
        if let Err(e) = logging::init(data_dir, settings.debug_mode) {
            eprintln!("Logging disabled: {e}");
        }
    }
    log::info!("persona_chat start: {}", chrono::Local::now());
    // Writes back missing keys so the file documents every tunable.
    if let Err(e) = settings.save() {
        log::warn!("Failed to write settings: {e}");
    }
    log::debug!("Using endpoint {}", credentials.base_url);

    let model = Arc::new(OpenAIChatModel::new(&credentials));
    let retriever = WebRetriever::duckduckgo(reqwest::Client::new());
    let pipeline = TurnPipeline::new(model, retriever, PipelineConfig::from(&settings));

    let mut app = App::new(settings, pipeline);
    app.run().await
}
