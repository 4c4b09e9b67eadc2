//! Scrolling view over the stage
//!
//! The view follows the player: each frame it scrolls so the ship appears at
//! [`Player::screen_pos`](super::player::Player::screen_pos). `scroll` is the
//! world position under the screen's bottom-left corner, always wrapped into
//! the stage. Everything the host draws is placed relative to it, and the
//! radar uses it to tell which enemies are already in view.

use glam::Vec2;

use super::collision::torus_delta;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE, WORLD_HEIGHT, WORLD_WIDTH};
use crate::math::{Rect, point_in_rect, wrap_range};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Background {
    scroll: Vec2,
}

impl Background {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scroll so the world point `world` shows at screen point `screen`
    pub fn move_with_screen(&mut self, world: Vec2, screen: Vec2) {
        self.scroll = Vec2::new(
            wrap_range(world.x - screen.x, 0.0, WORLD_WIDTH),
            wrap_range(world.y - screen.y, 0.0, WORLD_HEIGHT),
        );
    }

    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Where the tile grid starts relative to the screen origin, in
    /// `(-TILE_SIZE, 0]` on each axis
    pub fn tile_offset(&self) -> Vec2 {
        -Vec2::new(
            self.scroll.x.rem_euclid(TILE_SIZE),
            self.scroll.y.rem_euclid(TILE_SIZE),
        )
    }

    /// The screen in screen coordinates
    pub fn screen_rect() -> Rect {
        Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    /// Screen position of the copy of `world` nearest the screen center
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        let center = Self::screen_rect().center();
        center + torus_delta(self.scroll + center, world)
    }

    /// Whether `world` is inside the visible screen (edges inclusive)
    pub fn is_on_screen(&self, world: Vec2) -> bool {
        point_in_rect(self.to_screen(world), &Self::screen_rect())
    }
}
