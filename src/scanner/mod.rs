pub mod periodic;

pub use periodic::{spawn_periodic, ScanHandle};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rand::Rng;
use tracing::{debug, warn};

use crate::feed::SignalSource;
use crate::models::{Market, ScanTimeframe};
use crate::strategies::signal_generator::draw_quote;
use crate::strategies::signals::ScanRow;

/// Clock label in `tz`: `HH:MM`, or `HH:MM:SS` when `seconds` is set.
pub fn time_label(now: DateTime<Utc>, tz: Tz, seconds: bool) -> String {
    let local = now.with_timezone(&tz);
    if seconds {
        local.format("%H:%M:%S").to_string()
    } else {
        local.format("%H:%M").to_string()
    }
}

/// One scan pass over `market`. Hourly rows carry the scan time, minute rows
/// are labelled "Live".
pub fn scan_rows<R: Rng + ?Sized>(
    market: &Market,
    timeframe: ScanTimeframe,
    now: DateTime<Utc>,
    tz: Tz,
    rng: &mut R,
) -> Vec<ScanRow> {
    let quote = draw_quote(market, rng);
    let time = match timeframe {
        ScanTimeframe::Hourly => time_label(now, tz, false),
        ScanTimeframe::Minute => "Live".to_string(),
    };
    vec![ScanRow::from_quote(&quote, timeframe, time)]
}

/// Rows currently on display for one timeframe. Each refresh replaces them
/// wholesale.
#[derive(Debug, Clone)]
pub struct ScanFeed {
    pub timeframe: ScanTimeframe,
    market: String,
    tz: Tz,
    rows: Vec<ScanRow>,
    /// When set, used instead of Utc::now() for labels (tests)
    pub sim_time: Option<DateTime<Utc>>,
}

impl ScanFeed {
    pub fn new(timeframe: ScanTimeframe, market: &str, tz: Tz) -> Self {
        Self {
            timeframe,
            market: market.to_string(),
            tz,
            rows: Vec::new(),
            sim_time: None,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.sim_time.unwrap_or_else(Utc::now)
    }

    pub fn rows(&self) -> &[ScanRow] {
        &self.rows
    }

    /// Ask `source` for a fresh scan. Non-empty results are re-stamped with
    /// the current `HH:MM:SS`; an empty result shows a single Wait row; an error
    /// leaves the previous rows in place.
    pub async fn refresh(&mut self, source: &mut dyn SignalSource) -> &[ScanRow] {
        match source.scan_market(self.timeframe).await {
            Ok(rows) => self.apply(rows),
            Err(e) => warn!("Scan {} failed: {:#}", self.timeframe, e),
        }
        &self.rows
    }

    fn apply(&mut self, rows: Vec<ScanRow>) {
        let now = self.now();
        if rows.is_empty() {
            debug!("Scan {} returned nothing, showing WAIT", self.timeframe);
            let time = time_label(now, self.tz, false);
            self.rows = vec![ScanRow::waiting(&self.market, self.timeframe, time)];
            return;
        }
        let stamp = time_label(now, self.tz, true);
        self.rows = rows
            .into_iter()
            .map(|row| ScanRow {
                time: stamp.clone(),
                ..row
            })
            .collect();
    }
}
