use chrono::Utc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CEvent, KeyEvent};

use crate::display::Update;
use crate::schedule::next_tick_delay;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Fired on each wall-clock second boundary.
    Tick,
    Data(Update),
    Resize,
}

impl From<Update> for Event {
    fn from(update: Update) -> Self {
        Event::Data(update)
    }
}

pub struct EventHandler {
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || {
            // Re-aligned every second so the clock never drifts behind.
            let mut next_tick = Instant::now() + next_tick_delay(Utc::now());
            loop {
                let timeout = next_tick.saturating_duration_since(Instant::now());

                if event::poll(timeout).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(CEvent::Key(key)) => input_tx.send(Event::Key(key)),
                        Ok(CEvent::Resize(_, _)) => input_tx.send(Event::Resize),
                        Ok(_) => Ok(()),
                        Err(_) => break,
                    };
                    if forwarded.is_err() {
                        break;
                    }
                }

                if Instant::now() >= next_tick {
                    if input_tx.send(Event::Tick).is_err() {
                        break;
                    }
                    next_tick = Instant::now() + next_tick_delay(Utc::now()).max(Duration::from_millis(50));
                }
            }
        });

        Self { tx, rx }
    }

    /// Sender for background tasks that feed the same loop.
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
