//! Star growth over time, built from the stargazers list.

use chrono::NaiveDate;
use serde::Serialize;

use crate::github::Stargazer;

/// GitHub refuses to page past this many stargazer pages.
pub const MAX_STARGAZER_PAGES: usize = 400;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarPoint {
    pub date: NaiveDate,
    pub stars: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarHistory {
    /// One point per UTC day with at least one new star, ascending.
    pub points: Vec<StarPoint>,
    pub total_stars: u64,
    /// Number of stargazers the points were computed from.
    pub sampled: usize,
}

impl StarHistory {
    /// Builds the cumulative series from a (possibly partial) stargazer list.
    ///
    /// When fewer stargazers were fetched than the repository has stars, a
    /// closing point at `today` with `total_stars` is appended so the curve
    /// ends at the real count.
    pub fn from_stargazers(stargazers: &[Stargazer], total_stars: u64, today: NaiveDate) -> Self {
        let mut days: Vec<NaiveDate> = stargazers
            .iter()
            .map(|s| s.starred_at.date_naive())
            .collect();
        days.sort_unstable();

        let mut points: Vec<StarPoint> = Vec::new();
        for (i, day) in days.iter().enumerate() {
            let stars = i as u64 + 1;
            match points.last_mut() {
                Some(last) if last.date == *day => last.stars = stars,
                _ => points.push(StarPoint { date: *day, stars }),
            }
        }

        if (days.len() as u64) < total_stars {
            match points.last_mut() {
                Some(last) if last.date >= today => last.stars = total_stars,
                _ => points.push(StarPoint {
                    date: today,
                    stars: total_stars,
                }),
            }
        }

        Self {
            points,
            total_stars,
            sampled: days.len(),
        }
    }

    pub fn is_truncated(&self) -> bool {
        (self.sampled as u64) < self.total_stars
    }
}
