//! Release classification, paginated accumulation, and the downloads series.

mod classify;
mod feed;
mod series;

pub use classify::{classify_latest, latest_release};
pub use feed::{DEFAULT_PER_PAGE, PageOutcome, PageTicket, ReleaseFeed};
pub use series::{DownloadPoint, cumulative_downloads};
