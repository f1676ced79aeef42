//! System tray icon with state-based updates.
//!
//! Manages a system tray icon with three states (Idle, Recording, Processing)
//! and a context menu for backend selection and Exit. Icons are drawn at
//! runtime so no resource files need to ship with the binary.

use crate::{AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use image::{Rgba, RgbaImage};
use tracing::{info, instrument};
use tray_icon::menu::{CheckMenuItem, IsMenuItem, Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};
use voicekey_core::AsrService;

const ICON_SIZE: u32 = 32;

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    volcengine_item: CheckMenuItem,
    tencent_item: CheckMenuItem,
    exit_item_id: MenuId,
}

impl TrayManager {
    /// Create a new tray manager with initial state.
    #[track_caller]
    #[instrument]
    pub fn new(active_backend: AsrService) -> AppResult<Self> {
        let menu = Menu::new();

        let volcengine_item = CheckMenuItem::new(
            "Volcengine",
            true,
            active_backend == AsrService::Volcengine,
            None,
        );
        let tencent_item = CheckMenuItem::new(
            "Tencent Cloud",
            true,
            active_backend == AsrService::Tencent,
            None,
        );
        let exit_item = MenuItem::new("Exit", true, None);

        let exit_id = exit_item.id().clone();

        let separator = PredefinedMenuItem::separator();
        menu.append_items(&[
            &volcengine_item as &dyn IsMenuItem,
            &tencent_item,
            &separator,
            &exit_item,
        ])
        .map_err(|e| AppError::ConfigError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let icon = Self::draw_icon(TrayIconState::Idle)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip("VoiceKey - Ready")
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            volcengine_item,
            tencent_item,
            exit_item_id: exit_id,
        })
    }

    /// Update the tray icon state with new icon and tooltip.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        let (icon, tooltip) = match state {
            TrayIconState::Idle => (Self::draw_icon(state)?, "VoiceKey - Ready"),
            TrayIconState::Recording => (Self::draw_icon(state)?, "VoiceKey - Recording..."),
            TrayIconState::Processing => (Self::draw_icon(state)?, "VoiceKey - Recognizing..."),
        };

        self.tray_icon
            .set_icon(Some(icon))
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(tooltip))
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Move the check mark to the active backend.
    pub fn update_backend(&mut self, service: AsrService) {
        self.volcengine_item
            .set_checked(service == AsrService::Volcengine);
        self.tencent_item.set_checked(service == AsrService::Tencent);
    }

    /// Get the Volcengine menu item ID.
    pub fn volcengine_item_id(&self) -> &MenuId {
        self.volcengine_item.id()
    }

    /// Get the Tencent menu item ID.
    pub fn tencent_item_id(&self) -> &MenuId {
        self.tencent_item.id()
    }

    /// Get the exit menu item ID.
    pub fn exit_item_id(&self) -> &MenuId {
        &self.exit_item_id
    }

    /// Draw the tray icon for a state.
    ///
    /// A microphone-ish capsule in white, with a colored status dot in the
    /// top-right corner for the non-idle states.
    #[track_caller]
    fn draw_icon(state: TrayIconState) -> AppResult<Icon> {
        let mut img = RgbaImage::from_pixel(ICON_SIZE, ICON_SIZE, Rgba([0, 0, 0, 0]));

        // White matches other menu bar icons on dark and light trays.
        let white = Rgba([255, 255, 255, 255]);

        // Capsule body.
        draw_rect(&mut img, 12, 4, 8, 14, white);
        draw_circle(&mut img, 15, 5, 4, white);
        draw_circle(&mut img, 15, 17, 4, white);
        // Stand.
        draw_rect(&mut img, 14, 22, 4, 4, white);
        draw_rect(&mut img, 9, 26, 14, 3, white);

        match state {
            TrayIconState::Idle => {}
            TrayIconState::Recording => {
                let red = Rgba([255, 59, 48, 255]);
                draw_circle(&mut img, 26, 6, 5, red);
            }
            TrayIconState::Processing => {
                let amber = Rgba([255, 204, 0, 255]);
                draw_circle(&mut img, 26, 6, 5, amber);
            }
        }

        Icon::from_rgba(img.into_raw(), ICON_SIZE, ICON_SIZE).map_err(|e| {
            AppError::ConfigError {
                reason: format!("Failed to create icon from RGBA: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}

fn draw_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    for py in y..(y + h).min(img.height()) {
        for px in x..(x + w).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

fn draw_circle(img: &mut RgbaImage, cx: u32, cy: u32, radius: u32, color: Rgba<u8>) {
    let width = img.width();
    let height = img.height();
    let r_sq = (radius * radius) as i32;

    for dy in -(radius as i32)..=(radius as i32) {
        for dx in -(radius as i32)..=(radius as i32) {
            if dx * dx + dy * dy <= r_sq {
                let px = cx as i32 + dx;
                let py = cy as i32 + dy;
                if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                    img.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}
