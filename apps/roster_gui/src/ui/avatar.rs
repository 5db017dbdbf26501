//! Avatar rendering strategies.
//!
//! The style is resolved once at startup (platform default, CLI override)
//! and injected as a trait object; render code never branches on the
//! platform again.

use std::collections::{HashMap, HashSet};

use clap::ValueEnum;
use eframe::egui;
use shared::domain::{UserId, UserRecord};

pub const AVATAR_SIZE: f32 = 36.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AvatarStyle {
    /// Colored badge showing the user's initials.
    Initials,
    /// Remote avatar image referenced by the record.
    Image,
}

impl AvatarStyle {
    pub fn resolve(cli_override: Option<AvatarStyle>) -> AvatarStyle {
        cli_override.unwrap_or(if cfg!(target_os = "macos") {
            AvatarStyle::Initials
        } else {
            AvatarStyle::Image
        })
    }

    pub fn renderer(self) -> Box<dyn AvatarRenderer> {
        match self {
            AvatarStyle::Initials => Box::new(InitialsAvatar),
            AvatarStyle::Image => Box::new(RemoteImageAvatar),
        }
    }
}

/// Decoded RGBA avatar pixels produced by the fetch worker.
#[derive(Clone)]
pub struct AvatarImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub enum AvatarState {
    Loading,
    Ready { texture: egui::TextureHandle },
    Failed(String),
}

/// Per-user cache of remote avatar textures.
#[derive(Default)]
pub struct AvatarImageCache {
    entries: HashMap<UserId, AvatarState>,
}

impl AvatarImageCache {
    pub fn state(&self, user_id: UserId) -> Option<&AvatarState> {
        self.entries.get(&user_id)
    }

    pub fn mark_loading(&mut self, user_id: UserId) {
        self.entries.insert(user_id, AvatarState::Loading);
    }

    pub fn mark_failed(&mut self, user_id: UserId, reason: String) {
        self.entries.insert(user_id, AvatarState::Failed(reason));
    }

    /// Drops cached textures for users no longer in the list, after a batch
    /// replacement.
    pub fn retain_users(&mut self, users: &[UserRecord]) {
        let keep: HashSet<UserId> = users.iter().map(|user| user.id).collect();
        self.entries.retain(|id, _| keep.contains(id));
    }

    pub fn insert_loaded(&mut self, ctx: &egui::Context, user_id: UserId, image: AvatarImage) {
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [image.width, image.height],
            &image.rgba,
        );
        let texture = ctx.load_texture(
            format!("avatar:{}", user_id.0),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        self.entries.insert(user_id, AvatarState::Ready { texture });
    }
}

/// A request for avatar bytes the renderer could not satisfy from the cache.
pub struct AvatarRequest {
    pub user_id: UserId,
    pub url: String,
}

pub trait AvatarRenderer {
    /// Draws the avatar cell for one row. Returns a fetch request when
    /// remote bytes are needed and not yet cached.
    fn show(
        &self,
        ui: &mut egui::Ui,
        user: &UserRecord,
        cache: &mut AvatarImageCache,
    ) -> Option<AvatarRequest>;
}

pub struct InitialsAvatar;

impl AvatarRenderer for InitialsAvatar {
    fn show(
        &self,
        ui: &mut egui::Ui,
        user: &UserRecord,
        _cache: &mut AvatarImageCache,
    ) -> Option<AvatarRequest> {
        draw_initials_badge(ui, user);
        None
    }
}

pub struct RemoteImageAvatar;

impl AvatarRenderer for RemoteImageAvatar {
    fn show(
        &self,
        ui: &mut egui::Ui,
        user: &UserRecord,
        cache: &mut AvatarImageCache,
    ) -> Option<AvatarRequest> {
        match cache.state(user.id) {
            Some(AvatarState::Ready { texture }) => {
                ui.add(
                    egui::Image::new(texture)
                        .fit_to_exact_size(egui::vec2(AVATAR_SIZE, AVATAR_SIZE)),
                );
                None
            }
            Some(AvatarState::Failed(reason)) => {
                draw_initials_badge(ui, user)
                    .on_hover_text(format!("Avatar unavailable: {reason}"));
                None
            }
            // Badge fallback while bytes are still in flight.
            Some(AvatarState::Loading) => {
                draw_initials_badge(ui, user);
                None
            }
            None => {
                cache.mark_loading(user.id);
                draw_initials_badge(ui, user);
                Some(AvatarRequest {
                    user_id: user.id,
                    url: user.avatar.clone(),
                })
            }
        }
    }
}

const BADGE_PALETTE: [egui::Color32; 6] = [
    egui::Color32::from_rgb(88, 101, 242),
    egui::Color32::from_rgb(67, 181, 129),
    egui::Color32::from_rgb(250, 166, 26),
    egui::Color32::from_rgb(237, 66, 69),
    egui::Color32::from_rgb(89, 54, 149),
    egui::Color32::from_rgb(59, 165, 93),
];

/// Badge color picked deterministically from the user id.
pub fn badge_color(user_id: UserId) -> egui::Color32 {
    let index = (user_id.0.unsigned_abs() as usize) % BADGE_PALETTE.len();
    BADGE_PALETTE[index]
}

fn draw_initials_badge(ui: &mut egui::Ui, user: &UserRecord) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(AVATAR_SIZE, AVATAR_SIZE),
        egui::Sense::hover(),
    );
    let painter = ui.painter();
    painter.circle_filled(rect.center(), AVATAR_SIZE / 2.0, badge_color(user.id));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        user.initials(),
        egui::FontId::proportional(14.0),
        egui::Color32::WHITE,
    );
    response
}
