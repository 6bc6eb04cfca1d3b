//! Show what is saved locally.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::Path;
use userlist_sync_client::{KeyValueStore, LocalCacheStore};

/// Summary of the local cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    /// Number of saved records, `None` if nothing readable is saved.
    pub records: Option<usize>,
    /// When the saved snapshot was written.
    pub last_updated: Option<DateTime<Utc>>,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.records, self.last_updated) {
            (Some(records), Some(ts)) => {
                writeln!(f, "Cache:")?;
                writeln!(f, "  Records: {}", records)?;
                write!(f, "  Saved:   {} ({})", ts.to_rfc3339(), format_age(ts, Utc::now()))
            }
            _ => write!(f, "Cache: EMPTY"),
        }
    }
}

/// Run the status command.
pub async fn run<K: KeyValueStore>(
    cache: &LocalCacheStore<K>,
    database: &Path,
) -> Result<CacheStatus> {
    let status = CacheStatus {
        records: cache.read().await.map(|s| s.len()),
        last_updated: cache.last_updated().await,
    };

    println!("=== userlist status ===");
    println!();
    println!("Database: {}", database.display());
    println!(
        "Keys:     {} / {}",
        cache.keys().records,
        cache.keys().timestamp
    );
    println!("{}", status);
    if status.records.is_none() {
        println!();
        println!("Run 'userlist load' to fetch the user list.");
    }

    Ok(status)
}

/// Format the age of `ts` relative to `now`.
fn format_age(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - ts).num_seconds().max(0);

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        format!("{} minutes ago", diff / 60)
    } else if diff < 86400 {
        format!("{} hours ago", diff / 3600)
    } else {
        format!("{} days ago", diff / 86400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use userlist_sync_client::{CacheKeys, MemoryStore, SqliteStore};
    use userlist_sync_types::Snapshot;

    #[tokio::test]
    async fn status_of_empty_cache() {
        let cache = LocalCacheStore::new(MemoryStore::new(), CacheKeys::default());

        let status = run(&cache, Path::new("userlist.db")).await.unwrap();
        assert_eq!(status.records, None);
        assert_eq!(status.last_updated, None);
        assert_eq!(status.to_string(), "Cache: EMPTY");
    }

    #[tokio::test]
    async fn status_with_saved_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userlist.db");
        let cache = LocalCacheStore::new(
            SqliteStore::new(&path).await.unwrap(),
            CacheKeys::default(),
        );
        let snapshot = Snapshot::capture(vec![]);
        cache.persist(&snapshot).await.unwrap();

        let status = run(&cache, &path).await.unwrap();
        assert_eq!(status.records, Some(0));
        assert_eq!(status.last_updated, Some(snapshot.timestamp()));
        assert!(status.to_string().contains("Records: 0"));
    }

    #[test]
    fn format_age_works() {
        let now = Utc::now();

        assert_eq!(format_age(now, now), "just now");
        assert!(format_age(now - Duration::seconds(120), now).contains("minutes"));
        assert!(format_age(now - Duration::seconds(7200), now).contains("hours"));
        assert!(format_age(now - Duration::seconds(172800), now).contains("days"));
    }
}
