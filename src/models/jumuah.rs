use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum number of Friday slots a board shows at once.
pub const MAX_JUMUAH_SLOTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumuahRow {
    pub masjid_id: String,
    pub slot: u32,
    pub khutbah_time: String,
    pub jamaat_time: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

impl JumuahRow {
    /// A missing bound leaves that side of the range open.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.valid_from.is_none_or(|from| from <= date)
            && self.valid_until.is_none_or(|until| date <= until)
    }
}
