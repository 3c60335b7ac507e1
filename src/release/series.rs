use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::github::Release;

/// One bar of the downloads chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadPoint {
    pub tag: String,
    pub published_at: Option<DateTime<Utc>>,
    pub downloads: u64,
    pub cumulative: u64,
}

/// Cumulative downloads per release, oldest release first.
///
/// `releases` is in fetch order (newest first), so the series walks it
/// backwards. The last point's `cumulative` equals the total over all
/// releases.
pub fn cumulative_downloads(releases: &[Release]) -> Vec<DownloadPoint> {
    let mut cumulative = 0;
    releases
        .iter()
        .rev()
        .map(|release| {
            let downloads = release.download_count();
            cumulative += downloads;
            DownloadPoint {
                tag: release.tag_name.clone(),
                published_at: release.published_at,
                downloads,
                cumulative,
            }
        })
        .collect()
}
