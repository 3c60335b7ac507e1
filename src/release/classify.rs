use crate::github::Release;

/// Marks the first stable release in `releases` as latest.
///
/// `releases` must be in platform order (newest first); the order is trusted
/// as given. Drafts and prereleases are never latest. Of the remaining
/// releases, only the first one encountered gets `latest = true`, so at most
/// one flag is set and none is set when every release is a draft or a
/// prerelease.
///
/// The scan is linear and idempotent: flags from a previous run are
/// overwritten, never consulted.
pub fn classify_latest(releases: &mut [Release]) {
    let mut found = false;
    for release in releases.iter_mut() {
        if release.draft || release.prerelease {
            release.latest = false;
            continue;
        }
        release.latest = !found;
        found = true;
    }
}

/// The release [`classify_latest`] would mark, without touching any flags.
pub fn latest_release(releases: &[Release]) -> Option<&Release> {
    releases.iter().find(|r| !r.draft && !r.prerelease)
}
