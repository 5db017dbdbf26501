//! Random Roster desktop GUI: one screen of randomly generated user
//! profiles with a cooldown-guarded refresh and a floating add-one action.

mod backend_bridge;
mod controller;
mod ui;

use std::time::Duration;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use url::Url;

use backend_bridge::commands::BackendCommand;
use backend_bridge::runtime;
use controller::events::UiEvent;
use ui::avatar::AvatarStyle;
use ui::RosterApp;

#[derive(Debug, Parser)]
#[command(name = "roster_gui", about = "Random user roster screen")]
struct Cli {
    /// Random-user API endpoint.
    #[arg(long, default_value = directory_client::DEFAULT_ENDPOINT)]
    endpoint: Url,

    /// Minimum seconds between accepted refreshes.
    #[arg(long, default_value_t = 10)]
    cooldown_secs: u64,

    /// Avatar rendering override; defaults per platform.
    #[arg(long, value_enum)]
    avatar_style: Option<AvatarStyle>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    runtime::launch(cli.endpoint, cmd_rx, ui_tx);

    let avatar_style = AvatarStyle::resolve(cli.avatar_style);
    let cooldown = Duration::from_secs(cli.cooldown_secs);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Random Roster")
            .with_inner_size([420.0, 720.0])
            .with_min_inner_size([360.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Random Roster",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(RosterApp::new(
                cmd_tx, ui_rx, avatar_style, cooldown,
            )))
        }),
    )
}
