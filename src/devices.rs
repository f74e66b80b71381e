//! Abstractions over the keypad and display.

use std::time::{Duration, Instant};

use crate::definitions::keyboard;

/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will display all from the pixels
    fn display<M: AsRef<[V]>, V: AsRef<[bool]>>(&mut self, pixels: M);
}

/// A single slot of the keypad latch.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeySlot {
    pressed: bool,
    pressed_at: Option<Instant>,
}

/// The latch between the host input stream and the synthetic 16 key
/// hex keypad.
///
/// The latch is written only by the input worker and read by the
/// execution unit. As the raw terminal never reports key releases, a
/// slot counts as held down only for a short window after its press;
/// [`release_expired`](Keypad::release_expired) clears it afterwards.
#[derive(Debug, Default)]
pub struct Keypad {
    slots: [KeySlot; keyboard::SIZE],
}

impl Keypad {
    /// Will initiate a new keypad with all keys up
    pub fn new() -> Self {
        Keypad::default()
    }

    /// Registers a press of the given key.
    ///
    /// All other slots are cleared first, so at most one key is ever
    /// considered down at a time.
    pub fn press(&mut self, key: usize) {
        log::debug!("key press {:#X}", key);

        for slot in self.slots.iter_mut() {
            slot.pressed = false;
        }

        self.slots[key] = KeySlot {
            pressed: true,
            pressed_at: Some(Instant::now()),
        };
    }

    /// Clears every slot whose press is older than the given window.
    pub fn release_expired(&mut self, window: Duration) {
        for slot in self.slots.iter_mut() {
            if !slot.pressed {
                continue;
            }
            if let Some(pressed_at) = slot.pressed_at {
                if pressed_at.elapsed() > window {
                    slot.pressed = false;
                }
            }
        }
    }

    /// Will check if the given key is currently down
    pub fn is_pressed(&self, key: usize) -> bool {
        self.slots[key].pressed
    }

    /// Will return the lowest key index that is currently down
    pub fn first_pressed(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.pressed)
    }
}

/// Maps a host character onto its keypad index.
///
/// The layout mirrors the left hand block of a QWERTZ/QWERTY keyboard
/// onto the 4x4 hex pad:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// q w e r  =>  4 5 6 D
/// a s d f      7 8 9 E
/// y x c v      A 0 B F
/// ```
pub fn map_key(c: char) -> Option<usize> {
    let key = match c.to_ascii_lowercase() {
        '1' => 0x1,
        '2' => 0x2,
        '3' => 0x3,
        '4' => 0xC,
        'q' => 0x4,
        'w' => 0x5,
        'e' => 0x6,
        'r' => 0xD,
        'a' => 0x7,
        's' => 0x8,
        'd' => 0x9,
        'f' => 0xE,
        'y' => 0xA,
        'x' => 0x0,
        'c' => 0xB,
        'v' => 0xF,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_holds_exactly_one_key() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.first_pressed(), None);

        keypad.press(0x4);
        assert!(keypad.is_pressed(0x4));
        assert_eq!(keypad.first_pressed(), Some(0x4));

        // a second press releases the first key
        keypad.press(0xA);
        assert!(!keypad.is_pressed(0x4));
        assert!(keypad.is_pressed(0xA));
        assert_eq!(
            keypad.slots.iter().filter(|slot| slot.pressed).count(),
            1
        );
    }

    #[test]
    fn test_release_expired() {
        let mut keypad = Keypad::new();
        keypad.press(0x7);

        // a generous window keeps the key down
        keypad.release_expired(Duration::from_secs(60));
        assert!(keypad.is_pressed(0x7));

        // a zero window releases it right away
        keypad.release_expired(Duration::from_millis(0));
        assert!(!keypad.is_pressed(0x7));
    }

    #[test]
    fn test_map_key_layout() {
        let data = [
            ('1', 0x1),
            ('2', 0x2),
            ('3', 0x3),
            ('4', 0xC),
            ('q', 0x4),
            ('w', 0x5),
            ('e', 0x6),
            ('r', 0xD),
            ('a', 0x7),
            ('s', 0x8),
            ('d', 0x9),
            ('f', 0xE),
            ('y', 0xA),
            ('x', 0x0),
            ('c', 0xB),
            ('v', 0xF),
        ];

        for (c, key) in data.iter() {
            assert_eq!(map_key(*c), Some(*key));
            assert_eq!(map_key(c.to_ascii_uppercase()), Some(*key));
        }

        for c in ['5', 'z', 'm', ' ', '\n'].iter() {
            assert_eq!(map_key(*c), None);
        }
    }
}
