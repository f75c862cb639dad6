use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Block,
    Frame,
};
use std::time::Instant;

use crate::display::{BoardLoader, BoardView, Screen, SlideKind, Slideshow};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{
    announcements, clock, hadith, header, jumuah, message, next_prayer, prayers, qr, selector, statusbar, weather,
};

pub struct App {
    pub slideshow: Slideshow,
    pub should_quit: bool,
    hijri_offset: i32,
}

impl App {
    pub fn new(slideshow: Slideshow, hijri_offset: i32) -> Self {
        Self {
            slideshow,
            should_quit: false,
            hijri_offset,
        }
    }

    /// Returns a masjid id when the selector confirmed one.
    pub fn handle_key(&mut self, key: KeyEvent, loader: &BoardLoader<Event>) -> Option<String> {
        // Only handle actual key presses; some terminals also send release/repeat
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let (at, now) = (Instant::now(), Utc::now());
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') => loader.refresh(),
            KeyCode::Right if self.slideshow.screen == Screen::Board => self.slideshow.next_slide(at, now),
            KeyCode::Left if self.slideshow.screen == Screen::Board => self.slideshow.prev_slide(at, now),
            KeyCode::Up => self.slideshow.move_selection(-1),
            KeyCode::Down => self.slideshow.move_selection(1),
            KeyCode::Enter => return self.slideshow.choose_selected(at),
            _ => {}
        }
        None
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        match &self.slideshow.screen {
            Screen::Starting => message::render(frame, area, "minbar", "Loading…"),
            Screen::Usage(text) => message::render(frame, area, "minbar", text),
            Screen::NotFound(text) => message::render(frame, area, "Masjid not found", text),
            Screen::Selector { masjids, selected } => selector::render(frame, area, masjids, *selected),
            Screen::Board => self.draw_board(frame, area),
        }
    }

    fn draw_board(&self, frame: &mut Frame, area: Rect) {
        let now = Utc::now();
        let view = self.slideshow.view(now);
        let visible = self.slideshow.visible(&view);
        let index = self.slideshow.rotation().current(visible.len());
        let slide = visible.get(index).copied();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // header
                Constraint::Min(0),    // slide
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let masjid = self.slideshow.board.masjid.as_ref();
        header::render(
            frame,
            chunks[0],
            masjid.map(|m| m.name.as_str()),
            masjid.map(|m| m.city.as_str()),
            &view.clock,
        );

        if let Some(slide) = slide {
            self.draw_slide(frame, chunks[1], slide, &view);
        }

        let board = &self.slideshow.board;
        let status = statusbar::Status {
            slide: slide.map(|s| s.title()),
            position: (index, visible.len()),
            progress: self.slideshow.progress(Instant::now()),
            offline: board.offline,
            error: board
                .last_error
                .as_deref()
                .or(view.stale_prayers.then_some("Prayer times out of date")),
        };
        statusbar::render(frame, chunks[2], &status);
    }

    fn draw_slide(&self, frame: &mut Frame, area: Rect, slide: SlideKind, view: &BoardView) {
        let board = &self.slideshow.board;
        match slide {
            SlideKind::Clock => clock::render(frame, area, &view.clock, self.hijri_offset),
            SlideKind::Prayers => prayers::render(frame, area, board.prayers_for(view), view.next.as_ref()),
            SlideKind::Next => next_prayer::render(frame, area, view.next.as_ref(), view.countdown.as_deref()),
            SlideKind::Weather => weather::render(frame, area, &board.weather),
            SlideKind::Hadith => hadith::render(frame, area, &board.hadith),
            SlideKind::Jumuah => jumuah::render(frame, area, &board.jumuah),
            SlideKind::Announcements => announcements::render(frame, area, &view.announcements),
            SlideKind::Qr => {
                if let Some(url) = self.slideshow.deck().qr_url() {
                    qr::render(frame, area, url, board.masjid.as_ref().map(|m| m.label()));
                }
            }
        }
    }
}

/// Run the board until the operator quits. `loader` must be built on
/// `events.sender()` so its updates arrive in this loop.
pub fn run(mut app: App, events: EventHandler, mut loader: BoardLoader<Event>) -> Result<()> {
    match app.slideshow.masjid_id().map(str::to_string) {
        Some(id) => loader.select(&id),
        None => loader.load_directory(),
    }

    let mut terminal = ratatui::init();
    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| app.draw(frame))?;

            match events.next()? {
                Event::Key(key) => {
                    if let Some(id) = app.handle_key(key, &loader) {
                        loader.select(&id);
                    }
                    if app.should_quit {
                        break;
                    }
                }
                Event::Tick => {
                    app.slideshow.tick(Instant::now(), Utc::now());
                }
                Event::Data(update) => app.slideshow.apply(update, Utc::now()),
                Event::Resize => {}
            }
        }
        Ok(())
    })();

    ratatui::restore();
    loader.shutdown();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{Deck, Fetched, Update};
    use crate::models::{BoardData, Masjid};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn app(slides: &[SlideKind], masjid: Option<&str>) -> App {
        let slideshow = Slideshow::new(
            Deck::new(slides, None),
            Duration::from_secs(10),
            None,
            masjid.map(str::to_string),
            Instant::now(),
        );
        App::new(slideshow, 0)
    }

    #[test]
    fn usage_screen_when_directory_is_empty() {
        let mut app = app(&SlideKind::ALL, None);
        app.slideshow.apply(Update::Directory(Vec::new()), Utc::now());
        assert!(rendered(&app).contains("No masjid selected."));
    }

    #[test]
    fn offline_board_shows_banner_and_slide() {
        let mut app = app(&[SlideKind::Prayers], Some("central"));
        let data = BoardData {
            masjid: Masjid {
                id: "central".into(),
                name: "Central Masjid".into(),
                short_name: None,
                city: "Rome".into(),
                timezone: "Europe/Rome".into(),
                latitude: None,
                longitude: None,
            },
            date: "2024-05-10".into(),
            prayers: Vec::new(),
            jumuah: Vec::new(),
            announcements: Vec::new(),
        };
        app.slideshow.apply(Update::Board(Fetched { value: data, offline: true }), Utc::now());

        let screen = rendered(&app);
        assert!(screen.contains("Central Masjid"));
        assert!(screen.contains("Prayer Times"));
        assert!(screen.contains("OFFLINE"));
        assert!(screen.contains("--:--"));
    }
}
