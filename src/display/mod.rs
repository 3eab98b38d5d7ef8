//! # Display Module
//!
//! Opaque rendering surface plus the two control-state renderers.
//!
//! The actual display hardware lives outside this crate; everything here
//! draws through the [`DisplaySurface`] trait (filled rectangles and text,
//! best effort, no return contract). The transmit loop decimates rendering
//! to every Nth active cycle, so nothing here is on the per-packet path.

use tracing::trace;

use crate::attitude::AttitudeSample;

/// RGB565 colors used by the renderers.
pub mod colors {
    pub const BLACK: u16 = 0x0000;
    pub const WHITE: u16 = 0xFFFF;
    pub const GREEN: u16 = 0x07E0;
    pub const RED: u16 = 0xF800;
    pub const CYAN: u16 = 0x07FF;
    pub const YELLOW: u16 = 0xFFE0;
    pub const ORANGE: u16 = 0xFD20;
    pub const DARK_GREY: u16 = 0x7BEF;
}

/// Opaque sink for visual feedback.
///
/// Implementations are best-effort; nothing in the control loop depends on
/// a draw having taken effect.
pub trait DisplaySurface: Send {
    /// Draw a filled rectangle.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: u16);

    /// Draw a text string with foreground and background colors.
    fn draw_text(&mut self, x: i32, y: i32, color: u16, bg: u16, text: &str);
}

/// Surface that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl DisplaySurface for NullSurface {
    fn fill_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _color: u16) {}
    fn draw_text(&mut self, _x: i32, _y: i32, _color: u16, _bg: u16, _text: &str) {}
}

/// Surface that logs draws at trace level. Stand-in for a real panel when
/// running on a development host.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceSurface;

impl DisplaySurface for TraceSurface {
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: u16) {
        trace!(x, y, w, h, color, "fill_rect");
    }

    fn draw_text(&mut self, x: i32, y: i32, color: u16, bg: u16, text: &str) {
        trace!(x, y, color, bg, text, "draw_text");
    }
}

/// Visual style, selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// No periodic rendering
    Off,
    /// Horizontal/vertical bars per channel
    Bar,
    /// Crosshair at the attitude position, throttle column at the edge
    Mark,
}

/// Display geometry (320x240 panel, matching the original transmitter)
const BAR_X: i32 = 28;
const BAR_Y: i32 = 60;
const BAR_LEN: u32 = 160;
const SCREEN_W: i32 = 320;
const SCREEN_H: i32 = 240;
const MARK_SIZE: u32 = 16;

/// Squared response curve for the bar display.
///
/// Sign-preserving square re-centered to [0, 1]: small deflections barely
/// move the bar, full deflections pin it. Saturates outside [0, 1].
#[must_use]
pub fn curve(x: f32) -> f32 {
    let v = if x < 0.0 { -(x * x) } else { x * x };
    (v + 0.5).clamp(0.0, 1.0)
}

/// Periodic control-state renderer.
///
/// Owns the erase positions the mark style needs between frames. Driven by
/// the transmit loop at a decimated rate.
#[derive(Debug)]
pub struct Renderer {
    mode: DisplayMode,
    show_compass: bool,
    prev_cross: (i32, i32),
    prev_north: (i32, i32),
}

impl Renderer {
    #[must_use]
    pub fn new(mode: DisplayMode, show_compass: bool) -> Self {
        Self {
            mode,
            show_compass,
            prev_cross: (0, 0),
            prev_north: (0, 0),
        }
    }

    #[must_use]
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Draw the static chrome once at startup (title, bar labels).
    pub fn draw_static(&self, surface: &mut dyn DisplaySurface) {
        surface.draw_text(20, 0, colors::GREEN, colors::BLACK, "propo link");
        if self.mode == DisplayMode::Bar {
            surface.draw_text(40, 28, colors::WHITE, colors::BLACK, "CH1: ROLL");
            surface.draw_text(30, 130, colors::WHITE, colors::BLACK, "CH2: PITCH");
            surface.draw_text(196, 130, colors::WHITE, colors::BLACK, "CH3: THROTTLE");
            surface.draw_text(40, 212, colors::WHITE, colors::BLACK, "CH4: YAW");
        }
    }

    /// Render one frame of control state.
    pub fn render(&mut self, surface: &mut dyn DisplaySurface, att: &AttitudeSample, throttle: f32) {
        match self.mode {
            DisplayMode::Off => {}
            DisplayMode::Bar => self.render_bars(surface, att, throttle),
            DisplayMode::Mark => self.render_mark(surface, att, throttle),
        }
    }

    fn render_bars(&self, surface: &mut dyn DisplaySurface, att: &AttitudeSample, throttle: f32) {
        // Roll: horizontal bar, filled from the left
        let v = (curve(att.roll) * BAR_LEN as f32) as u32;
        surface.fill_rect(BAR_X, 40, v, 16, colors::CYAN);
        surface.fill_rect(BAR_X + v as i32, 40, BAR_LEN - v, 16, colors::DARK_GREY);

        // Pitch: vertical bar, filled from the bottom
        let v = (curve(att.pitch) * BAR_LEN as f32) as u32;
        surface.fill_rect(100, BAR_Y, 24, BAR_LEN - v, colors::DARK_GREY);
        surface.fill_rect(100, BAR_Y + (BAR_LEN - v) as i32, 24, v, colors::GREEN);

        // Throttle: vertical bar, filled from the bottom
        let v = (throttle.clamp(0.0, 1.0) * BAR_LEN as f32) as u32;
        surface.fill_rect(280, BAR_Y, 24, BAR_LEN - v, colors::DARK_GREY);
        surface.fill_rect(280, BAR_Y + (BAR_LEN - v) as i32, 24, v, colors::ORANGE);

        // Yaw: fixed at center (no sensor axis behind it)
        let v = BAR_LEN / 2;
        surface.fill_rect(BAR_X, 224, v, 16, colors::YELLOW);
        surface.fill_rect(BAR_X + v as i32, 224, BAR_LEN - v, 16, colors::DARK_GREY);
    }

    fn render_mark(&mut self, surface: &mut dyn DisplaySurface, att: &AttitudeSample, throttle: f32) {
        let cx = (SCREEN_W / 2 + (240.0 * att.roll) as i32).max(0);
        let cy = (SCREEN_H / 2 + (240.0 * att.pitch) as i32).max(0);

        if self.show_compass {
            let mx = (SCREEN_W / 2 + (120.0 * att.east) as i32).max(0);
            let my = (SCREEN_H / 2 - (120.0 * att.north) as i32).max(0);

            let (px, py) = self.prev_north;
            surface.fill_rect(px, py, MARK_SIZE, MARK_SIZE, colors::BLACK);
            surface.draw_text(mx, my, colors::CYAN, colors::BLACK, "N");
            self.prev_north = (mx, my);
        }

        let (px, py) = self.prev_cross;
        surface.fill_rect(px, py, MARK_SIZE, MARK_SIZE, colors::BLACK);
        surface.draw_text(cx, cy, colors::YELLOW, colors::BLACK, "x");
        self.prev_cross = (cx, cy);

        // Throttle column on the right edge
        let h = (throttle.clamp(0.0, 1.0) * SCREEN_H as f32) as u32;
        let top = SCREEN_H - h as i32;
        surface.fill_rect(SCREEN_W - 16, 0, 15, top.max(0) as u32, colors::BLACK);
        surface.fill_rect(SCREEN_W - 16, top, 15, h, colors::ORANGE);
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Recorded draw operation
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Rect {
            x: i32,
            y: i32,
            w: u32,
            h: u32,
            color: u16,
        },
        Text {
            x: i32,
            y: i32,
            color: u16,
            text: String,
        },
    }

    /// Surface that records every draw for assertions
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub ops: Vec<DrawOp>,
    }

    impl DisplaySurface for RecordingSurface {
        fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: u16) {
            self.ops.push(DrawOp::Rect { x, y, w, h, color });
        }

        fn draw_text(&mut self, x: i32, y: i32, color: u16, _bg: u16, text: &str) {
            self.ops.push(DrawOp::Text {
                x,
                y,
                color,
                text: text.to_string(),
            });
        }
    }
}
