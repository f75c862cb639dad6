use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{BoardData, HadithSnapshot, Masjid, WeatherSnapshot};
use crate::offline::{FetchError, OfflineWorker, Request, Served, Source};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Network(#[from] FetchError),

    #[error("offline and nothing cached for {0}")]
    Offline(String),

    #[error("{0}")]
    NotFound(String),

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("bad request url: {0}")]
    Url(String),
}

impl ClientError {
    /// Failures where retrying later may succeed and last data should stay.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Offline(_))
    }
}

/// A decoded payload plus whether it was served without the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub offline: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct RevisionBody {
    revision: u64,
}

/// Typed access to the board server, always through the offline worker.
#[derive(Clone)]
pub struct RemoteClient {
    worker: Arc<OfflineWorker>,
}

impl RemoteClient {
    pub fn new(worker: Arc<OfflineWorker>) -> Self {
        Self { worker }
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = self.worker.url(path).map_err(|e| ClientError::Url(e.to_string()))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Fetched<T>, ClientError> {
        let Served { response, source } = self.worker.fetch(&Request::get(url.clone())).await?;
        if source == Source::Synthesized {
            return Err(ClientError::Offline(url.path().to_string()));
        }
        if !response.is_success() {
            let message = response
                .json::<ErrorBody>()
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&response.body).into_owned());
            return Err(if response.status == 404 {
                ClientError::NotFound(message)
            } else {
                ClientError::Server {
                    status: response.status,
                    message,
                }
            });
        }
        let value = response.json::<T>().map_err(|e| ClientError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Fetched {
            value,
            offline: source == Source::Cache,
        })
    }

    pub async fn directory(&self) -> Result<Fetched<Vec<Masjid>>, ClientError> {
        self.get_json(self.url("/api/masjids", &[])?).await
    }

    pub async fn board(&self, masjid_id: &str, tz: Option<&str>) -> Result<Fetched<BoardData>, ClientError> {
        let query: Vec<(&str, &str)> = tz.map(|t| ("tz", t)).into_iter().collect();
        let mut url = self.url("/api/masjids", &query)?;
        let base = url.to_string();
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(format!("{} cannot take a path", base)))?
            .push(masjid_id)
            .push("today");
        self.get_json(url).await
    }

    /// Coordinates when the masjid has them, its city otherwise.
    pub async fn weather(&self, masjid: &Masjid, tz: &str) -> Result<Fetched<WeatherSnapshot>, ClientError> {
        let url = match masjid.coordinates() {
            Some((lat, lon)) => {
                let (lat, lon) = (lat.to_string(), lon.to_string());
                self.url(
                    "/api/weather",
                    &[
                        ("lat", lat.as_str()),
                        ("lon", lon.as_str()),
                        ("city", masjid.city.as_str()),
                        ("tz", tz),
                    ],
                )?
            }
            None => self.url("/api/weather", &[("city", masjid.city.as_str()), ("tz", tz)])?,
        };
        self.get_json(url).await
    }

    pub async fn hadith(&self, edition: Option<&str>, seed: &str) -> Result<Fetched<HadithSnapshot>, ClientError> {
        let mut query = vec![("seed", seed)];
        if let Some(edition) = edition {
            query.push(("edition", edition));
        }
        self.get_json(self.url("/api/hadith", &query)?).await
    }

    pub async fn revision(&self) -> Result<Fetched<u64>, ClientError> {
        let body: Fetched<RevisionBody> = self.get_json(self.url("/api/revision", &[])?).await?;
        Ok(Fetched {
            value: body.value.revision,
            offline: body.offline,
        })
    }
}
