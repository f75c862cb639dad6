use chrono::Utc;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::display::board::Panel;
use crate::display::client::{ClientError, Fetched, RemoteClient};
use crate::models::{BoardData, HadithSnapshot, Masjid, WeatherSnapshot};
use crate::schedule::{local_clock, until_next_midnight};

/// Results delivered from background tasks to the UI thread.
#[derive(Debug, Clone)]
pub enum Update {
    Directory(Vec<Masjid>),
    DirectoryUnavailable(String),
    Board(Fetched<BoardData>),
    NotFound(String),
    /// Nothing reachable and nothing cached; existing data stays.
    Transient(String),
    Weather(Panel<WeatherSnapshot>),
    Hadith(Panel<HadithSnapshot>),
    Revision(u64),
}

#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub tz_override: Option<String>,
    pub hadith_edition: Option<String>,
    pub refresh: Duration,
    pub watch: Duration,
}

fn into_panel<T>(result: Result<Fetched<T>, ClientError>) -> Option<Panel<T>> {
    match result {
        Ok(fetched) => Some(Panel::Ready(fetched.value)),
        Err(e) if e.is_transient() => None,
        Err(e) => Some(Panel::Unavailable(e.to_string())),
    }
}

struct Task<E> {
    client: RemoteClient,
    tx: Sender<E>,
    token: CancellationToken,
    options: Arc<LoaderOptions>,
    refresh: Arc<Notify>,
}

impl<E: From<Update> + Send + 'static> Task<E> {
    /// Dropped once the token fires or the receiver is gone.
    fn emit(&self, update: Update) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.tx.send(update.into()).is_ok()
    }

    async fn directory(self) {
        let result = self.client.directory().await;
        let update = match result {
            Ok(fetched) => Update::Directory(fetched.value),
            Err(e) => {
                log::warn!("Masjid directory unavailable: {}", e);
                Update::DirectoryUnavailable(e.to_string())
            }
        };
        self.emit(update);
    }

    async fn board(self, masjid_id: String) {
        let mut masjid = None;
        let mut revision = None;
        while self.load(&masjid_id, &mut masjid).await {
            let tz = self
                .options
                .tz_override
                .clone()
                .or_else(|| masjid.as_ref().map(|m| m.timezone.clone()));
            if !self.wait_for_change(&mut revision, tz.as_deref()).await {
                break;
            }
        }
        log::debug!("Board task for {} stopped", masjid_id);
    }

    async fn load(&self, masjid_id: &str, masjid: &mut Option<Masjid>) -> bool {
        let result = self.client.board(masjid_id, self.options.tz_override.as_deref()).await;
        if self.token.is_cancelled() {
            return false;
        }
        let update = match result {
            Ok(fetched) => {
                *masjid = Some(fetched.value.masjid.clone());
                Update::Board(fetched)
            }
            Err(ClientError::NotFound(message)) => {
                *masjid = None;
                Update::NotFound(message)
            }
            Err(e) => {
                log::warn!("Board refresh for {} failed: {}", masjid_id, e);
                Update::Transient(e.to_string())
            }
        };
        if !self.emit(update) {
            return false;
        }

        let Some(masjid) = masjid.as_ref() else {
            return true;
        };
        let tz = self
            .options
            .tz_override
            .clone()
            .unwrap_or_else(|| masjid.timezone.clone());
        let seed = local_clock(Some(&tz), Utc::now()).date_key();
        let (weather, hadith) = tokio::join!(
            self.client.weather(masjid, &tz),
            self.client.hadith(self.options.hadith_edition.as_deref(), &seed),
        );
        if self.token.is_cancelled() {
            return false;
        }
        if let Some(panel) = into_panel(weather) {
            self.emit(Update::Weather(panel));
        }
        if let Some(panel) = into_panel(hadith) {
            self.emit(Update::Hadith(panel));
        }
        true
    }

    /// Sleep until the refresh interval, local midnight in `tz`, a manual
    /// refresh or a revision change. `false` when cancelled.
    async fn wait_for_change(&self, revision: &mut Option<u64>, tz: Option<&str>) -> bool {
        let refresh = tokio::time::sleep(self.options.refresh);
        let rollover = tokio::time::sleep(until_next_midnight(tz, Utc::now()));
        tokio::pin!(refresh, rollover);
        loop {
            tokio::select! {
                _ = self.token.cancelled() => return false,
                _ = &mut refresh => return true,
                _ = &mut rollover => {
                    log::info!("Local date changed, reloading board");
                    return true;
                }
                _ = self.refresh.notified() => return true,
                _ = tokio::time::sleep(self.options.watch) => {
                    let result = self.client.revision().await;
                    if self.token.is_cancelled() {
                        return false;
                    }
                    match result {
                        Ok(fetched) if !fetched.offline => {
                            let changed = revision.is_some_and(|r| r != fetched.value);
                            *revision = Some(fetched.value);
                            if changed {
                                log::info!("Board revision changed to {}", fetched.value);
                                self.emit(Update::Revision(fetched.value));
                                return true;
                            }
                        }
                        Ok(_) => {}
                        Err(e) => log::debug!("Revision check failed: {}", e),
                    }
                }
            }
        }
    }
}

/// Owns the background fetch tasks for the display. Selecting a masjid
/// cancels every task started for the previous one.
pub struct BoardLoader<E> {
    client: RemoteClient,
    tx: Sender<E>,
    handle: Handle,
    options: Arc<LoaderOptions>,
    root: CancellationToken,
    current: Option<CancellationToken>,
    refresh: Arc<Notify>,
}

impl<E: From<Update> + Send + 'static> BoardLoader<E> {
    pub fn new(client: RemoteClient, tx: Sender<E>, handle: Handle, options: LoaderOptions) -> Self {
        Self {
            client,
            tx,
            handle,
            options: Arc::new(options),
            root: CancellationToken::new(),
            current: None,
            refresh: Arc::new(Notify::new()),
        }
    }

    fn task(&self, token: CancellationToken) -> Task<E> {
        Task {
            client: self.client.clone(),
            tx: self.tx.clone(),
            token,
            options: self.options.clone(),
            refresh: self.refresh.clone(),
        }
    }

    pub fn load_directory(&self) {
        let task = self.task(self.root.child_token());
        self.handle.spawn(task.directory());
    }

    pub fn select(&mut self, masjid_id: &str) {
        if let Some(old) = self.current.take() {
            old.cancel();
        }
        let token = self.root.child_token();
        self.current = Some(token.clone());
        log::info!("Loading board for {}", masjid_id);
        self.handle.spawn(self.task(token).board(masjid_id.to_string()));
    }

    /// Skip the rest of the current wait and reload now.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn shutdown(&self) {
        self.root.cancel();
    }
}

impl<E> Drop for BoardLoader<E> {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
