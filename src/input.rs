//! Per-frame keyboard, mouse and character input.
//!
//! A [`Platform`](crate::app::Platform) feeds events in through the
//! `handle_*` methods; [`InputState::begin_frame`] snapshots the current
//! state so edge queries (`*_pressed`, `*_released`) compare against the
//! previous frame.

use glam::Vec2;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Keyboard keys, numbered like GLFW key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Key {
    Space = 32,
    Apostrophe = 39,
    Comma = 44,
    Minus = 45,
    Period = 46,
    Slash = 47,
    Num0 = 48,
    Num1 = 49,
    Num2 = 50,
    Num3 = 51,
    Num4 = 52,
    Num5 = 53,
    Num6 = 54,
    Num7 = 55,
    Num8 = 56,
    Num9 = 57,
    Semicolon = 59,
    Equal = 61,
    A = 65,
    B = 66,
    C = 67,
    D = 68,
    E = 69,
    F = 70,
    G = 71,
    H = 72,
    I = 73,
    J = 74,
    K = 75,
    L = 76,
    M = 77,
    N = 78,
    O = 79,
    P = 80,
    Q = 81,
    R = 82,
    S = 83,
    T = 84,
    U = 85,
    V = 86,
    W = 87,
    X = 88,
    Y = 89,
    Z = 90,
    Escape = 256,
    Enter = 257,
    Tab = 258,
    Backspace = 259,
    Right = 262,
    Left = 263,
    Down = 264,
    Up = 265,
}

impl Key {
    const LETTERS: [Key; 26] = [
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
    ];

    const DIGITS: [Key; 10] = [
        Key::Num0,
        Key::Num1,
        Key::Num2,
        Key::Num3,
        Key::Num4,
        Key::Num5,
        Key::Num6,
        Key::Num7,
        Key::Num8,
        Key::Num9,
    ];

    /// Maps a platform key code; unknown codes yield `None`.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        let key = match code {
            32 => Key::Space,
            39 => Key::Apostrophe,
            44 => Key::Comma,
            45 => Key::Minus,
            46 => Key::Period,
            47 => Key::Slash,
            48..=57 => Self::DIGITS[(code - 48) as usize],
            59 => Key::Semicolon,
            61 => Key::Equal,
            65..=90 => Self::LETTERS[(code - 65) as usize],
            256 => Key::Escape,
            257 => Key::Enter,
            258 => Key::Tab,
            259 => Key::Backspace,
            262 => Key::Right,
            263 => Key::Left,
            264 => Key::Down,
            265 => Key::Up,
            _ => return None,
        };
        Some(key)
    }

    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Mouse button index, `0..MouseButton::COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MouseButton(u8);

impl MouseButton {
    pub const COUNT: u8 = 8;
    pub const LEFT: Self = Self(0);
    pub const RIGHT: Self = Self(1);
    pub const MIDDLE: Self = Self(2);

    /// `None` for indices past the last supported button.
    #[must_use]
    pub fn new(index: u8) -> Option<Self> {
        (index < Self::COUNT).then_some(Self(index))
    }

    #[must_use]
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Key and button states of the current and the previous frame.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    keys: FxHashSet<Key>,
    previous_keys: FxHashSet<Key>,
    buttons: u8,
    previous_buttons: u8,
    mouse_position: Vec2,
    chars: Vec<char>,
}

impl InputState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new frame: current state becomes the previous state and
    /// the character queue is cleared.
    pub fn begin_frame(&mut self) {
        self.previous_keys.clone_from(&self.keys);
        self.previous_buttons = self.buttons;
        self.chars.clear();
    }

    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        let bit = 1 << button.0;
        if pressed {
            self.buttons |= bit;
        } else {
            self.buttons &= !bit;
        }
    }

    pub fn handle_cursor_move(&mut self, x: f64, y: f64) {
        self.mouse_position = Vec2::new(x as f32, y as f32);
    }

    pub fn handle_char(&mut self, c: char) {
        self.chars.push(c);
    }

    #[must_use]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Down this frame, up the frame before.
    #[must_use]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys.contains(&key) && !self.previous_keys.contains(&key)
    }

    #[must_use]
    pub fn key_released(&self, key: Key) -> bool {
        !self.keys.contains(&key) && self.previous_keys.contains(&key)
    }

    #[must_use]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.buttons & (1 << button.0) != 0
    }

    #[must_use]
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        let bit = 1 << button.0;
        self.buttons & bit != 0 && self.previous_buttons & bit == 0
    }

    #[must_use]
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        let bit = 1 << button.0;
        self.buttons & bit == 0 && self.previous_buttons & bit != 0
    }

    /// Cursor position in window pixels.
    #[must_use]
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Characters typed since the last `begin_frame`.
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}
