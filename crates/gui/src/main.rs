mod app;
pub mod i18n;
mod ui;
mod viewport;

use app::PlannerApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roomplan=info,roomplan_lib=info".into()),
        )
        .init();

    // Model loads run here; the UI thread only polls their results
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("roomplan-loader")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return;
        }
    };
    let handle = runtime.handle().clone();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Room Planner")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "roomplan",
        native_options,
        Box::new(move |cc| Ok(Box::new(PlannerApp::new(cc, handle)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }

    runtime.shutdown_background();
}
