use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

use crate::display::board::{BoardState, BoardView};
use crate::display::deck::{Deck, SlideKind};
use crate::display::loader::Update;
use crate::display::rotation::Rotation;
use crate::models::Masjid;

pub const USAGE_MESSAGE: &str =
    "No masjid selected.\n\nRun `minbar display --masjid <id>` or set display.masjid_id in config.toml.";

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Waiting for the directory or the first board payload.
    Starting,
    Selector { masjids: Vec<Masjid>, selected: usize },
    Usage(String),
    NotFound(String),
    Board,
}

/// The display's state machine: which screen shows, which slide is up, and
/// what data backs it. No terminal or network access happens here.
pub struct Slideshow {
    pub screen: Screen,
    pub board: BoardState,
    deck: Deck,
    rotation: Rotation,
    tz_override: Option<String>,
    masjid_id: Option<String>,
}

impl Slideshow {
    pub fn new(deck: Deck, duration: Duration, tz_override: Option<String>, masjid_id: Option<String>, now: Instant) -> Self {
        Self {
            screen: Screen::Starting,
            board: BoardState::default(),
            deck,
            rotation: Rotation::new(duration, now),
            tz_override,
            masjid_id,
        }
    }

    pub fn masjid_id(&self) -> Option<&str> {
        self.masjid_id.as_deref()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn rotation(&self) -> &Rotation {
        &self.rotation
    }

    pub fn view(&self, now: DateTime<Utc>) -> BoardView {
        self.board.view(self.tz_override.as_deref(), now)
    }

    pub fn apply(&mut self, update: Update, now: DateTime<Utc>) {
        match update {
            Update::Directory(masjids) => {
                if self.masjid_id.is_none() {
                    self.screen = if masjids.is_empty() {
                        Screen::Usage(USAGE_MESSAGE.to_string())
                    } else {
                        Screen::Selector { masjids, selected: 0 }
                    };
                }
            }
            Update::DirectoryUnavailable(reason) => {
                if self.masjid_id.is_none() {
                    self.screen = Screen::Usage(format!("{USAGE_MESSAGE}\n\n({reason})"));
                }
            }
            Update::Board(fetched) => {
                self.board.apply_board(fetched.value, fetched.offline, now);
                self.screen = Screen::Board;
            }
            Update::NotFound(message) => {
                self.board = BoardState::default();
                self.screen = Screen::NotFound(message);
            }
            Update::Transient(message) => self.board.last_error = Some(message),
            Update::Weather(panel) => self.board.weather = panel,
            Update::Hadith(panel) => self.board.hadith = panel,
            Update::Revision(revision) => self.board.revision = Some(revision),
        }
    }

    pub fn visible(&self, view: &BoardView) -> Vec<SlideKind> {
        self.deck.visible(&self.board, view)
    }

    pub fn current_slide(&self, view: &BoardView) -> Option<SlideKind> {
        let visible = self.visible(view);
        visible.get(self.rotation.current(visible.len())).copied()
    }

    pub fn progress(&self, at: Instant) -> f64 {
        self.rotation.progress(at)
    }

    /// Advance the rotation when the current slide has run its course.
    pub fn tick(&mut self, at: Instant, now: DateTime<Utc>) -> bool {
        if self.screen != Screen::Board {
            return false;
        }
        let len = self.visible(&self.view(now)).len();
        self.rotation.tick(at, len)
    }

    pub fn next_slide(&mut self, at: Instant, now: DateTime<Utc>) {
        let len = self.visible(&self.view(now)).len();
        self.rotation.next(at, len);
    }

    pub fn prev_slide(&mut self, at: Instant, now: DateTime<Utc>) {
        let len = self.visible(&self.view(now)).len();
        self.rotation.prev(at, len);
    }

    pub fn set_duration(&mut self, duration: Duration, at: Instant) {
        self.rotation.set_duration(duration, at);
    }

    pub fn move_selection(&mut self, delta: isize) {
        if let Screen::Selector { masjids, selected } = &mut self.screen {
            if !masjids.is_empty() {
                let len = masjids.len() as isize;
                *selected = (*selected as isize + delta).rem_euclid(len) as usize;
            }
        }
    }

    /// Confirm the highlighted masjid; returns its id for the loader.
    pub fn choose_selected(&mut self, at: Instant) -> Option<String> {
        let Screen::Selector { masjids, selected } = &self.screen else {
            return None;
        };
        let id = masjids.get(*selected)?.id.clone();
        self.masjid_id = Some(id.clone());
        self.board = BoardState::default();
        self.screen = Screen::Starting;
        self.rotation.reset(at);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::board::Panel;
    use crate::display::client::Fetched;
    use crate::models::BoardData;
    use chrono::TimeZone;

    fn masjid(id: &str) -> Masjid {
        Masjid {
            id: id.into(),
            name: id.into(),
            short_name: None,
            city: "Rome".into(),
            timezone: "Europe/Rome".into(),
            latitude: None,
            longitude: None,
        }
    }

    fn board(id: &str, offline: bool) -> Update {
        Update::Board(Fetched {
            value: BoardData {
                masjid: masjid(id),
                date: "2024-05-09".into(),
                prayers: Vec::new(),
                jumuah: Vec::new(),
                announcements: Vec::new(),
            },
            offline,
        })
    }

    fn show(masjid_id: Option<&str>, slides: &[SlideKind]) -> Slideshow {
        Slideshow::new(
            Deck::new(slides, None),
            Duration::from_secs(10),
            None,
            masjid_id.map(str::to_string),
            Instant::now(),
        )
    }

    fn thursday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 9, 10, 0, 0).unwrap()
    }

    #[test]
    fn empty_directory_shows_usage() {
        let mut s = show(None, &SlideKind::ALL);
        s.apply(Update::Directory(Vec::new()), thursday());
        assert_eq!(s.screen, Screen::Usage(USAGE_MESSAGE.to_string()));

        let mut s = show(None, &SlideKind::ALL);
        s.apply(Update::DirectoryUnavailable("connection refused".into()), thursday());
        assert!(matches!(&s.screen, Screen::Usage(m) if m.contains("connection refused")));
    }

    #[test]
    fn directory_opens_selector_and_choice_starts_board() {
        let t0 = Instant::now();
        let mut s = show(None, &SlideKind::ALL);
        s.apply(Update::Directory(vec![masjid("a"), masjid("b")]), thursday());
        s.move_selection(-1);
        assert!(matches!(s.screen, Screen::Selector { selected: 1, .. }));
        assert_eq!(s.choose_selected(t0).as_deref(), Some("b"));
        assert_eq!(s.masjid_id(), Some("b"));
        assert_eq!(s.screen, Screen::Starting);
        assert_eq!(s.choose_selected(t0), None);
    }

    #[test]
    fn configured_masjid_ignores_directory() {
        let mut s = show(Some("a"), &SlideKind::ALL);
        s.apply(Update::Directory(Vec::new()), thursday());
        assert_eq!(s.screen, Screen::Starting);
    }

    #[test]
    fn unknown_masjid_is_full_screen_not_found() {
        let mut s = show(Some("ghost"), &SlideKind::ALL);
        s.apply(Update::NotFound("Masjid 'ghost' not found".into()), thursday());
        assert!(matches!(s.screen, Screen::NotFound(_)));
    }

    #[test]
    fn transient_failure_keeps_last_board() {
        let mut s = show(Some("a"), &SlideKind::ALL);
        s.apply(board("a", false), thursday());
        s.apply(Update::Transient("offline".into()), thursday());
        assert_eq!(s.screen, Screen::Board);
        assert!(s.board.is_loaded());
        assert_eq!(s.board.last_error.as_deref(), Some("offline"));

        s.apply(board("a", true), thursday());
        assert!(s.board.offline);
        assert!(s.board.last_error.is_none());
    }

    #[test]
    fn panels_update_independently() {
        let mut s = show(Some("a"), &SlideKind::ALL);
        s.apply(board("a", false), thursday());
        s.apply(Update::Hadith(Panel::Unavailable("502".into())), thursday());
        assert!(s.board.weather.is_loading());
        assert_eq!(s.board.hadith, Panel::Unavailable("502".into()));
    }

    #[test]
    fn rotation_runs_over_visible_slides_only() {
        let t0 = Instant::now();
        let mut s = Slideshow::new(
            Deck::new(&[SlideKind::Clock, SlideKind::Announcements, SlideKind::Hadith], None),
            Duration::from_secs(10),
            None,
            Some("a".into()),
            t0,
        );
        let now = thursday();
        assert!(!s.tick(t0 + Duration::from_secs(30), now));

        s.apply(board("a", false), now);
        let view = s.view(now);
        assert_eq!(s.current_slide(&view), Some(SlideKind::Clock));
        assert!(s.tick(t0 + Duration::from_secs(10), now));
        assert_eq!(s.current_slide(&view), Some(SlideKind::Hadith));
        s.next_slide(t0 + Duration::from_secs(11), now);
        assert_eq!(s.current_slide(&view), Some(SlideKind::Clock));
        s.prev_slide(t0 + Duration::from_secs(12), now);
        assert_eq!(s.current_slide(&view), Some(SlideKind::Hadith));
    }
}
