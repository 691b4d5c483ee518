use eframe::egui;
use rusty_iv::app::RustyIvApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty IV – I-V Curve Analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(RustyIvApp::default()))),
    )
}
