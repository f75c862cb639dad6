//! The unattended board: what to show, in which order, and where its data
//! comes from. Rendering lives in `tui`.

pub mod board;
pub mod client;
pub mod deck;
pub mod loader;
pub mod rotation;
pub mod slideshow;

pub use board::{BoardState, BoardView, Panel};
pub use client::{ClientError, Fetched, RemoteClient};
pub use deck::{Deck, SlideKind};
pub use loader::{BoardLoader, LoaderOptions, Update};
pub use rotation::{Rotation, MIN_SLIDE_DURATION};
pub use slideshow::{Screen, Slideshow};
