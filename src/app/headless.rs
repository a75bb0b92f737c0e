//! Windowless [`Platform`] fed from scripted events.
//!
//! Each call to `poll_events` replays one queued batch of events, so a
//! test can say exactly what happens on which frame. The platform closes
//! on its own after `max_frames` presented frames, when a
//! [`PlatformEvent::CloseRequested`] is replayed, or when the app asks.

use std::collections::VecDeque;

use super::Platform;
use crate::input::{InputState, Key, MouseButton};

/// One window-system event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    Key { key: Key, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool },
    CursorMoved { x: f64, y: f64 },
    Char(char),
    CloseRequested,
}

#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    frames: VecDeque<Vec<PlatformEvent>>,
    max_frames: Option<u64>,
    presented: u64,
    closed: bool,
}

impl HeadlessPlatform {
    /// A platform that stays open until closed explicitly.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A platform that closes after `frames` presented frames.
    #[must_use]
    pub fn with_frame_limit(frames: u64) -> Self {
        Self {
            max_frames: Some(frames),
            ..Self::default()
        }
    }

    /// Queues the events delivered on the next unscripted frame.
    pub fn push_frame(&mut self, events: impl IntoIterator<Item = PlatformEvent>) {
        self.frames.push_back(events.into_iter().collect());
    }

    #[must_use]
    pub fn presented(&self) -> u64 {
        self.presented
    }

    fn apply(&mut self, event: PlatformEvent, input: &mut InputState) {
        match event {
            PlatformEvent::Key { key, pressed } => input.handle_key(key, pressed),
            PlatformEvent::MouseButton { button, pressed } => input.handle_mouse_button(button, pressed),
            PlatformEvent::CursorMoved { x, y } => input.handle_cursor_move(x, y),
            PlatformEvent::Char(c) => input.handle_char(c),
            PlatformEvent::CloseRequested => self.closed = true,
        }
    }
}

impl Platform for HeadlessPlatform {
    fn poll_events(&mut self, input: &mut InputState) {
        let Some(events) = self.frames.pop_front() else {
            return;
        };
        for event in events {
            self.apply(event, input);
        }
    }

    fn should_close(&self) -> bool {
        self.closed || self.max_frames.is_some_and(|max| self.presented >= max)
    }

    fn present(&mut self) {
        self.presented += 1;
        log::trace!("Frame {} presented", self.presented);
    }

    fn request_close(&mut self) {
        self.closed = true;
    }
}
