//! App shell: event intake, screen layout, list rendering, and the floating
//! add action.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use eframe::egui;
use tracing::debug;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::state::{RefreshDecision, ScreenState};
use crate::ui::avatar::{AvatarImageCache, AvatarRenderer, AvatarStyle};

/// Queues a command for the fetch worker. Returns whether the command was
/// accepted; on failure the status line carries the reason.
pub fn queue_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = match &cmd {
        BackendCommand::LoadInitial => "load_initial",
        BackendCommand::Refresh => "refresh",
        BackendCommand::AddOne => "add_one",
        BackendCommand::FetchAvatarImage { .. } => "fetch_avatar_image",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "Fetch queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Fetch worker disconnected; restart the app".to_string();
            false
        }
    }
}

pub struct RosterApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    state: ScreenState,
    cooldown: Duration,

    avatar_renderer: Box<dyn AvatarRenderer>,
    avatars: AvatarImageCache,
}

impl RosterApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        avatar_style: AvatarStyle,
        cooldown: Duration,
    ) -> Self {
        let mut state = ScreenState::new();
        // Mount: kick off the initial batch immediately.
        queue_command(&cmd_tx, BackendCommand::LoadInitial, &mut state.status);
        Self {
            cmd_tx,
            ui_rx,
            state,
            cooldown,
            avatar_renderer: avatar_style.renderer(),
            avatars: AvatarImageCache::default(),
        }
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::AvatarImageLoaded { user_id, image } => {
                    self.avatars.insert_loaded(ctx, user_id, image);
                }
                UiEvent::AvatarImageFailed { user_id, reason } => {
                    debug!(user_id = user_id.0, "avatar image failed: {reason}");
                    self.avatars.mark_failed(user_id, reason);
                }
                other => {
                    // A wholesale list replacement drops stale avatar
                    // textures for users no longer shown.
                    if let UiEvent::BatchLoaded { users, .. } = &other {
                        self.avatars.retain_users(users);
                    }
                    self.state.apply(other);
                }
            }
        }
    }

    fn request_refresh(&mut self) {
        let previous_refresh = self.state.last_refresh;
        match self.state.begin_refresh(Instant::now(), self.cooldown) {
            RefreshDecision::Proceed => {
                // An accepted refresh that never reaches the worker must not
                // leave the spinner on or consume the cooldown window.
                if !queue_command(&self.cmd_tx, BackendCommand::Refresh, &mut self.state.status) {
                    self.state.cancel_refresh(previous_refresh);
                }
            }
            RefreshDecision::CoolingDown { remaining } => {
                debug!(
                    remaining_secs = remaining.as_secs(),
                    "refresh rejected by cooldown"
                );
            }
        }
    }

    fn show_loading_indicator(&self, ui: &mut egui::Ui) {
        // The whole view is the spinner until the first fetch resolves.
        ui.centered_and_justified(|ui| {
            ui.add(egui::Spinner::new().size(48.0));
        });
    }

    fn show_user_list(&mut self, ui: &mut egui::Ui) {
        if self.state.users.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.weak("No users loaded. Refresh to try again.");
            });
            return;
        }

        let mut avatar_requests = Vec::new();
        egui::ScrollArea::vertical()
            .auto_shrink(false)
            .show(ui, |ui| {
                for user in &self.state.users {
                    // Row ids derive from the record id, unique per batch.
                    ui.push_id(user.id, |ui| {
                        ui.horizontal(|ui| {
                            if let Some(request) =
                                self.avatar_renderer.show(ui, user, &mut self.avatars)
                            {
                                avatar_requests.push(request);
                            }
                            ui.vertical(|ui| {
                                ui.strong(user.full_name());
                                ui.weak(format!("#{}", user.id.0));
                            });
                        });
                        ui.separator();
                    });
                }
            });

        for request in avatar_requests {
            queue_command(
                &self.cmd_tx,
                BackendCommand::FetchAvatarImage {
                    user_id: request.user_id,
                    url: request.url,
                },
                &mut self.state.status,
            );
        }
    }

    fn show_add_button(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("add_user_fab"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-24.0, -40.0))
            .show(ctx, |ui| {
                let button = egui::Button::new(egui::RichText::new("+").size(22.0))
                    .min_size(egui::vec2(48.0, 48.0));
                if ui.add(button).on_hover_text("Add one random user").clicked() {
                    queue_command(&self.cmd_tx, BackendCommand::AddOne, &mut self.state.status);
                }
            });
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.state.alert.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(alert.title.as_str())
            .id(egui::Id::new("roster_alert"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(&alert.message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("Dismiss").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.state.alert = None;
        }
    }
}

impl eframe::App for RosterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);

        egui::TopBottomPanel::top("roster_top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Random Roster");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = if self.state.refreshing {
                        "Refreshing..."
                    } else {
                        "Refresh"
                    };
                    let refresh =
                        ui.add_enabled(!self.state.loading, egui::Button::new(label));
                    if refresh.clicked() {
                        self.request_refresh();
                    }
                    if self.state.refreshing {
                        ui.add(egui::Spinner::new());
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("roster_status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.state.status).weak());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.loading {
                self.show_loading_indicator(ui);
            } else {
                self.show_user_list(ui);
            }
        });

        if !self.state.loading {
            self.show_add_button(ctx);
        }
        self.show_alert(ctx);

        // Worker events arrive outside egui's input loop; poll for them.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
