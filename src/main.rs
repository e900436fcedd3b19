use kronoscope::application::chart_engine::ChartEngine;
use kronoscope::application::client::DeskClient;
use kronoscope::application::desk::Desk;
use kronoscope::application::worker::DeskWorker;
use kronoscope::config::Config;
use kronoscope::infrastructure::i18n::I18nService;
use tracing::{info, Level};
use tracing_subscriber::prelude::*;

// A writer that sends logs to the UI via a crossbeam channel
struct ChannelWriter {
    sender: crossbeam_channel::Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf).trim_end().to_string();
        let _ = self.sender.try_send(msg);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// Cloneable wrapper for MakeWriter
#[derive(Clone)]
struct ChannelWriterFactory {
    sender: crossbeam_channel::Sender<String>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ChannelWriterFactory {
    type Writer = ChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ChannelWriter {
            sender: self.sender.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // 0. Load Env (before starting anything)
    dotenvy::dotenv().ok();

    // 1. Create Log Channel
    let (log_tx, log_rx) = crossbeam_channel::unbounded();

    // 2. Setup Logging (Stdout + UI)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    let ui_layer = tracing_subscriber::fmt::layer()
        .with_writer(ChannelWriterFactory { sender: log_tx })
        .with_ansi(false)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .with(ui_layer)
        .init();

    info!("Initializing Kronoscope Desk...");

    let config = Config::from_env()?;

    // 3. Shared state and channels between UI and worker
    let engine = ChartEngine::new();
    let (command_tx, command_rx) = tokio::sync::mpsc::channel(32);
    let (event_tx, event_rx) = crossbeam_channel::unbounded();

    // 4. Background Tokio runtime hosting the worker
    let worker_config = config.clone();
    let worker_engine = engine.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to build Tokio runtime");

        rt.block_on(async move {
            info!("Background Runtime Started.");
            match DeskWorker::from_config(&worker_config, worker_engine, event_tx, command_rx) {
                Ok(worker) => worker.run().await,
                Err(e) => tracing::error!("Failed to build desk worker: {e:#}"),
            }
        });
    });

    // 5. Desk state for the UI thread
    let i18n = I18nService::new(&config.translations_dir, config.locale.as_deref());
    let client = DeskClient::new(command_tx, engine, event_rx, log_rx);
    let desk = Desk::new(client, i18n, config.theme);

    // 6. Run UI (Blocks Main Thread)
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Kronoscope"),
        ..Default::default()
    };

    eframe::run_native(
        "Kronoscope",
        native_options,
        Box::new(|cc| {
            kronoscope::interfaces::ui::configure_fonts(&cc.egui_ctx);
            Ok(Box::new(desk))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
