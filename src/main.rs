use clap::Parser;
use decision_dashboard::app::DashboardApp;
use decision_dashboard::config::Args;
use decision_dashboard::export::export_views;
use decision_dashboard::DatasetCache;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    if let Some(out) = &args.export {
        let cache = DatasetCache::new(&args.data_dir);
        return export_views(&cache, out);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Decision Intelligence Dashboard",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the png/jpg logo.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(DashboardApp::new(&args)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
