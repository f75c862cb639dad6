use serde::{Deserialize, Serialize};

use crate::display::board::{BoardState, BoardView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Clock,
    Prayers,
    Next,
    Weather,
    Hadith,
    Jumuah,
    Announcements,
    Qr,
}

impl SlideKind {
    pub const ALL: [SlideKind; 8] = [
        SlideKind::Clock,
        SlideKind::Prayers,
        SlideKind::Next,
        SlideKind::Weather,
        SlideKind::Hadith,
        SlideKind::Jumuah,
        SlideKind::Announcements,
        SlideKind::Qr,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SlideKind::Clock => "Today",
            SlideKind::Prayers => "Prayer Times",
            SlideKind::Next => "Next Prayer",
            SlideKind::Weather => "Weather",
            SlideKind::Hadith => "Hadith of the Day",
            SlideKind::Jumuah => "Jumu'ah",
            SlideKind::Announcements => "Announcements",
            SlideKind::Qr => "Visit Us",
        }
    }
}

/// The configured slide order. Which of them actually show is decided
/// against the board on every tick.
#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<SlideKind>,
    qr_url: Option<String>,
}

impl Deck {
    pub fn new(slides: &[SlideKind], qr_url: Option<String>) -> Self {
        let mut ordered = Vec::with_capacity(slides.len());
        for kind in slides {
            if !ordered.contains(kind) {
                ordered.push(*kind);
            }
        }
        if ordered.is_empty() {
            ordered = SlideKind::ALL.to_vec();
        }
        Self {
            slides: ordered,
            qr_url: qr_url.filter(|u| !u.trim().is_empty()),
        }
    }

    pub fn slides(&self) -> &[SlideKind] {
        &self.slides
    }

    pub fn qr_url(&self) -> Option<&str> {
        self.qr_url.as_deref()
    }

    /// Weather and hadith always show so their placeholder is visible.
    pub fn has_content(&self, kind: SlideKind, board: &BoardState, view: &BoardView) -> bool {
        match kind {
            SlideKind::Jumuah => view.is_friday && !board.jumuah.is_empty(),
            SlideKind::Announcements => !view.announcements.is_empty(),
            SlideKind::Qr => self.qr_url.is_some(),
            SlideKind::Clock
            | SlideKind::Prayers
            | SlideKind::Next
            | SlideKind::Weather
            | SlideKind::Hadith => true,
        }
    }

    pub fn visible(&self, board: &BoardState, view: &BoardView) -> Vec<SlideKind> {
        self.slides
            .iter()
            .copied()
            .filter(|kind| self.has_content(*kind, board, view))
            .collect()
    }
}
