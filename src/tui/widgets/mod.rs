pub mod announcements;
pub mod clock;
pub mod hadith;
pub mod header;
pub mod jumuah;
pub mod message;
pub mod next_prayer;
pub mod prayers;
pub mod qr;
pub mod selector;
pub mod statusbar;
pub mod weather;
