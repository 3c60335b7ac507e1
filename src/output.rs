//! Text and JSON rendering of a dashboard.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;

use crate::dashboard::Dashboard;
use crate::format::format_large_number;
use crate::github::{GetReleases, Release, RepositorySummary};
use crate::release::{DownloadPoint, cumulative_downloads};
use crate::stars::{StarHistory, StarPoint};

/// Rows shown for the star history in text mode.
const STAR_ROWS: usize = 12;

/// Everything the renderers need, borrowed from a [`Dashboard`].
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub repo: String,
    pub repository: Option<&'a RepositorySummary>,
    /// `None` until a non-empty release page arrived.
    pub total_downloads: Option<u64>,
    pub has_more_releases: bool,
    pub releases: &'a [Release],
    pub downloads: Vec<DownloadPoint>,
    pub stars: Option<&'a StarHistory>,
    pub errors: Vec<String>,
}

impl<'a> Snapshot<'a> {
    pub fn from_dashboard<G: GetReleases>(dashboard: &'a Dashboard<G>) -> Self {
        let feed = dashboard.feed();
        let errors = [
            dashboard.repository().error(),
            feed.last_error(),
            dashboard.star_history().error(),
        ]
        .into_iter()
        .flatten()
        .map(|e| e.to_string())
        .collect();

        Self {
            repo: dashboard.repo().to_string(),
            repository: dashboard.repository().loaded(),
            total_downloads: (feed.pages_loaded() > 0).then(|| feed.total_downloads()),
            has_more_releases: feed.has_next_page(),
            releases: feed.releases(),
            downloads: cumulative_downloads(feed.releases()),
            stars: dashboard.star_history().loaded(),
            errors,
        }
    }
}

pub fn render_json(snapshot: &Snapshot<'_>) -> Result<String> {
    serde_json::to_string_pretty(snapshot).context("Failed to serialize dashboard")
}

pub fn render_text(snapshot: &Snapshot<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_text(&mut out, snapshot);
    out
}

fn write_text(out: &mut String, snapshot: &Snapshot<'_>) -> std::fmt::Result {
    writeln!(out, "{}", snapshot.repo)?;
    writeln!(out, "{}", "-".repeat(43))?;

    if let Some(repository) = snapshot.repository {
        write_about(out, repository)?;
    }

    writeln!(out)?;
    match snapshot.total_downloads {
        Some(total) => {
            writeln!(out, "Downloads: {} downloads overall", format_large_number(total))?;
            for point in &snapshot.downloads {
                writeln!(
                    out,
                    "  {:<20} {:>10} {:>12}",
                    point.tag,
                    format_large_number(point.downloads),
                    format_large_number(point.cumulative)
                )?;
            }
        }
        None if snapshot.releases.is_empty() && snapshot.errors.is_empty() => {
            writeln!(out, "No releases exist for this repository")?;
        }
        None => {}
    }

    if let Some(stars) = snapshot.stars {
        writeln!(out)?;
        write_stars(out, stars)?;
    }

    if !snapshot.releases.is_empty() {
        writeln!(out)?;
        writeln!(out, "Releases:")?;
        for release in snapshot.releases {
            write_release(out, release)?;
        }
        writeln!(out)?;
        if snapshot.has_more_releases {
            writeln!(out, "More releases available (use --pages or --all)")?;
        } else {
            writeln!(out, "No more releases found")?;
        }
    }

    for error in &snapshot.errors {
        writeln!(out, "error: {}", error)?;
    }
    Ok(())
}

fn write_about(out: &mut String, repository: &RepositorySummary) -> std::fmt::Result {
    writeln!(out, "About")?;
    if let Some(description) = repository.description.as_deref() {
        writeln!(out, "  {}", description)?;
    }
    if let Some(homepage) = repository.homepage() {
        writeln!(out, "  Homepage : {}", homepage)?;
    }
    let license = repository
        .license
        .as_ref()
        .map(|l| match l.spdx_id.as_deref() {
            Some(spdx) if spdx != "NOASSERTION" => spdx.to_string(),
            _ => l.name.clone(),
        })
        .unwrap_or_else(|| "none".to_string());
    writeln!(out, "  License  : {}", license)?;
    writeln!(out, "  Stars    : {}", format_large_number(repository.stargazers_count))?;
    writeln!(out, "  Watchers : {}", format_large_number(repository.subscribers_count))?;
    writeln!(out, "  Forks    : {}", format_large_number(repository.forks_count))
}

fn write_release(out: &mut String, release: &Release) -> std::fmt::Result {
    let badge = if release.latest {
        "Latest"
    } else if release.draft {
        "Draft"
    } else if release.prerelease {
        "Pre-release"
    } else {
        ""
    };
    let date = release
        .published_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unpublished".to_string());

    writeln!(
        out,
        "  {:<20} {:<12} {:<11} {:>8} downloads",
        release.display_name(),
        badge,
        date,
        format_large_number(release.download_count())
    )
}

fn write_stars(out: &mut String, stars: &StarHistory) -> std::fmt::Result {
    writeln!(out, "Stars: {} stars", format_large_number(stars.total_stars))?;
    if stars.is_truncated() {
        writeln!(out, "  (history sampled from the first {} stargazers)", stars.sampled)?;
    }
    for point in sample_points(&stars.points, STAR_ROWS) {
        writeln!(out, "  {} {:>10}", point.date, format_large_number(point.stars))?;
    }
    Ok(())
}

/// Picks at most `max` evenly spaced points, always keeping the last one.
fn sample_points(points: &[StarPoint], max: usize) -> Vec<&StarPoint> {
    if points.len() <= max || max < 2 {
        return points.iter().take(max).collect();
    }
    let step = (points.len() - 1) as f64 / (max - 1) as f64;
    (0..max)
        .map(|i| &points[((i as f64) * step).round() as usize])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{License, Owner, ReleaseAsset};
    use chrono::NaiveDate;

    fn summary() -> RepositorySummary {
        RepositorySummary {
            name: "repo".to_string(),
            full_name: "owner/repo".to_string(),
            owner: Owner {
                login: "owner".to_string(),
                avatar_url: String::new(),
                html_url: String::new(),
            },
            html_url: "https://github.com/owner/repo".to_string(),
            description: Some("A test repo".to_string()),
            homepage: Some("https://example.com".to_string()),
            license: Some(License {
                key: "mit".to_string(),
                name: "MIT License".to_string(),
                spdx_id: Some("MIT".to_string()),
            }),
            stargazers_count: 1_500,
            forks_count: 12,
            subscribers_count: 3,
        }
    }

    fn release(id: u64, tag: &str, downloads: u64) -> Release {
        Release {
            id,
            tag_name: tag.to_string(),
            assets: vec![ReleaseAsset {
                name: "bin".to_string(),
                download_count: downloads,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn snapshot<'a>(
        repository: Option<&'a RepositorySummary>,
        releases: &'a [Release],
        total: Option<u64>,
    ) -> Snapshot<'a> {
        Snapshot {
            repo: "owner/repo".to_string(),
            repository,
            total_downloads: total,
            has_more_releases: false,
            releases,
            downloads: cumulative_downloads(releases),
            stars: None,
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_render_text_full() {
        let summary = summary();
        let mut releases = vec![release(2, "v2.0.0", 2_000), release(1, "v1.0.0", 500)];
        releases[0].latest = true;

        let text = render_text(&snapshot(Some(&summary), &releases, Some(2_500)));

        assert!(text.starts_with("owner/repo\n"));
        assert!(text.contains("A test repo"));
        assert!(text.contains("Homepage : https://example.com"));
        assert!(text.contains("License  : MIT"));
        assert!(text.contains("Stars    : 1.5k"));
        assert!(text.contains("Downloads: 2.5k downloads overall"));
        assert!(text.contains("Latest"));
        assert!(text.contains("No more releases found"));
    }

    #[test]
    fn test_render_text_no_releases() {
        let summary = summary();
        let text = render_text(&snapshot(Some(&summary), &[], None));

        assert!(text.contains("No releases exist for this repository"));
        assert!(!text.contains("downloads overall"));
    }

    #[test]
    fn test_render_text_lists_errors() {
        let mut snap = snapshot(None, &[], None);
        snap.errors.push("Request failed: HTTP 500".to_string());

        let text = render_text(&snap);

        assert!(text.contains("error: Request failed: HTTP 500"));
        assert!(!text.contains("No releases exist"));
    }

    #[test]
    fn test_render_json_includes_latest_flag() {
        let mut releases = vec![release(1, "v1.0.0", 7)];
        releases[0].latest = true;

        let json = render_json(&snapshot(None, &releases, Some(7))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total_downloads"], 7);
        assert_eq!(value["releases"][0]["latest"], true);
        assert_eq!(value["downloads"][0]["cumulative"], 7);
    }

    #[test]
    fn test_sample_points_keeps_ends() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points: Vec<StarPoint> = (0..100)
            .map(|i| StarPoint {
                date: start + chrono::Days::new(i),
                stars: i + 1,
            })
            .collect();

        let sampled = sample_points(&points, 12);

        assert_eq!(sampled.len(), 12);
        assert_eq!(sampled[0].stars, 1);
        assert_eq!(sampled[11].stars, 100);
    }

    #[test]
    fn test_sample_points_short_series_unchanged() {
        let points = vec![StarPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            stars: 1,
        }];
        assert_eq!(sample_points(&points, 12).len(), 1);
    }
}
