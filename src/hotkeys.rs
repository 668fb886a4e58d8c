//! Global keyboard handling for the capture session.
//!
//! Uses rdev for global key listening: one key arms a sequence capture,
//! another ends the session. The listener thread exposes polled atomic
//! state rather than pushing events, so the capture loop stays a plain
//! blocking loop.

use rdev::{listen, Event, EventType, Key};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::warn;

/// Map a config/CLI key name to an rdev key.
///
/// Supports single letters `a`-`z`, digits `0`-`9`, and `space`.
pub fn key_from_name(name: &str) -> Option<Key> {
    let key = match name.to_ascii_lowercase().as_str() {
        "a" => Key::KeyA,
        "b" => Key::KeyB,
        "c" => Key::KeyC,
        "d" => Key::KeyD,
        "e" => Key::KeyE,
        "f" => Key::KeyF,
        "g" => Key::KeyG,
        "h" => Key::KeyH,
        "i" => Key::KeyI,
        "j" => Key::KeyJ,
        "k" => Key::KeyK,
        "l" => Key::KeyL,
        "m" => Key::KeyM,
        "n" => Key::KeyN,
        "o" => Key::KeyO,
        "p" => Key::KeyP,
        "q" => Key::KeyQ,
        "r" => Key::KeyR,
        "s" => Key::KeyS,
        "t" => Key::KeyT,
        "u" => Key::KeyU,
        "v" => Key::KeyV,
        "w" => Key::KeyW,
        "x" => Key::KeyX,
        "y" => Key::KeyY,
        "z" => Key::KeyZ,
        "0" => Key::Num0,
        "1" => Key::Num1,
        "2" => Key::Num2,
        "3" => Key::Num3,
        "4" => Key::Num4,
        "5" => Key::Num5,
        "6" => Key::Num6,
        "7" => Key::Num7,
        "8" => Key::Num8,
        "9" => Key::Num9,
        "space" => Key::Space,
        _ => return None,
    };
    Some(key)
}

/// Global key listener with polled trigger/quit state.
pub struct KeyListener {
    trigger_key: Key,
    quit_key: Key,
    /// Set when the trigger key was pressed since the last poll
    trigger_pending: Arc<AtomicBool>,
    /// Set once the quit key was pressed
    quit_pending: Arc<AtomicBool>,
    /// Flag to stop the listener thread
    stop_flag: Arc<AtomicBool>,
    /// Handle to the listener thread
    listener_thread: Option<JoinHandle<()>>,
}

impl KeyListener {
    pub fn new(trigger_key: Key, quit_key: Key) -> Self {
        KeyListener {
            trigger_key,
            quit_key,
            trigger_pending: Arc::new(AtomicBool::new(false)),
            quit_pending: Arc::new(AtomicBool::new(false)),
            stop_flag: Arc::new(AtomicBool::new(false)),
            listener_thread: None,
        }
    }

    /// Start listening for global key presses.
    ///
    /// This spawns a background thread that captures global keyboard events.
    /// Returns an error if the listener is already running.
    pub fn start(&mut self) -> Result<(), String> {
        if self.listener_thread.is_some() {
            return Err("Key listener already running".to_string());
        }

        let trigger_key = self.trigger_key;
        let quit_key = self.quit_key;
        let trigger_pending = self.trigger_pending.clone();
        let quit_pending = self.quit_pending.clone();
        let stop_flag = self.stop_flag.clone();

        let handle = thread::spawn(move || {
            let callback = move |event: Event| {
                if stop_flag.load(Ordering::SeqCst) {
                    return;
                }

                if let EventType::KeyPress(key) = event.event_type {
                    if key == trigger_key {
                        trigger_pending.store(true, Ordering::SeqCst);
                    } else if key == quit_key {
                        quit_pending.store(true, Ordering::SeqCst);
                    }
                }
            };

            // Start the global listener (blocks until error or process exit)
            // Note: On macOS, this requires Accessibility permissions
            if let Err(e) = listen(callback) {
                warn!("key listener error: {:?}", e);
            }
        });

        self.listener_thread = Some(handle);
        Ok(())
    }

    /// Stop the key listener.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        // Note: rdev's listen() doesn't have a clean way to stop, so the
        // thread continues until the process exits. The stop_flag prevents
        // processing new events.
        self.listener_thread = None;
    }

    /// Check if the trigger key was pressed since the last poll, and reset.
    pub fn take_trigger(&self) -> bool {
        self.trigger_pending.swap(false, Ordering::SeqCst)
    }

    /// Check if the quit key has been pressed.
    pub fn quit_requested(&self) -> bool {
        self.quit_pending.load(Ordering::SeqCst)
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}
