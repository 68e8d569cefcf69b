use anyhow::{Context, Result};
use tracing::info;

use crate::models::college::{CollegeRecord, NewCollege};
use crate::store::CollegeStore;

const SAMPLE_COLLEGES: &str = include_str!("../data/colleges.json");

/// Parses the bundled sample dataset.
pub fn sample_colleges() -> Result<Vec<CollegeRecord>> {
    let raw: Vec<NewCollege> =
        serde_json::from_str(SAMPLE_COLLEGES).context("bundled college data is not valid JSON")?;
    raw.into_iter().map(CollegeRecord::try_from).collect()
}

/// Inserts the sample dataset if the store holds no colleges yet.
/// Returns the number of records inserted.
pub async fn seed_if_empty(store: &dyn CollegeStore) -> Result<usize> {
    let existing = store.count().await?;
    if existing > 0 {
        info!("College collection already has {existing} records. Skipping seed.");
        return Ok(0);
    }

    let colleges = sample_colleges()?;
    store.insert_many(&colleges).await?;
    info!("Seeded {} colleges", colleges.len());
    Ok(colleges.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::college::Course;
    use crate::store::memory::InMemoryCollegeStore;

    #[test]
    fn test_sample_data_is_valid() {
        let colleges = sample_colleges().unwrap();
        assert!(!colleges.is_empty());
        for course in Course::ALL {
            assert!(colleges.iter().any(|c| c.course == course));
        }
    }

    #[tokio::test]
    async fn test_seed_runs_once() {
        let store = InMemoryCollegeStore::new();
        let inserted = seed_if_empty(&store).await.unwrap();
        assert!(inserted > 0);
        assert_eq!(seed_if_empty(&store).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), inserted as u64);
    }
}
