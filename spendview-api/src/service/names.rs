use spendview_warehouse::JobMetadata;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Memoized job-name lookups. A name is resolved once per service instance
/// and cached forever, including the synthesized fallback for jobs the
/// metadata source cannot name; resolution never fails.
pub struct NameResolver {
    jobs: Arc<dyn JobMetadata>,
    cache: Mutex<HashMap<String, String>>,
}

impl NameResolver {
    pub fn new(jobs: Arc<dyn JobMetadata>) -> Self {
        Self {
            jobs,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn resolve(&self, job_id: &str) -> String {
        if let Some(name) = self.cache.lock().await.get(job_id) {
            return name.clone();
        }
        let name = match self.jobs.fetch_name(job_id).await {
            Ok(Some(name)) => name,
            Ok(None) => fallback_name(job_id),
            Err(err) => {
                tracing::warn!("job name lookup failed for {job_id}: {err}");
                fallback_name(job_id)
            }
        };
        // The lock is not held across the fetch, so two in-flight lookups can
        // race; insert-if-absent keeps the first resolution authoritative.
        let mut cache = self.cache.lock().await;
        cache.entry(job_id.to_string()).or_insert(name).clone()
    }
}

fn fallback_name(job_id: &str) -> String {
    format!("Job {job_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendview_warehouse::mock::MockJobs;

    #[tokio::test]
    async fn resolves_and_memoizes() {
        let jobs = Arc::new(MockJobs::new());
        jobs.insert_name("101", "Nightly ETL");
        let resolver = NameResolver::new(jobs.clone());

        assert_eq!(resolver.resolve("101").await, "Nightly ETL");
        assert_eq!(resolver.resolve("101").await, "Nightly ETL");
        assert_eq!(jobs.fetch_calls().len(), 1);
    }

    #[tokio::test]
    async fn unknown_job_gets_fallback() {
        let jobs = Arc::new(MockJobs::new());
        let resolver = NameResolver::new(jobs.clone());
        assert_eq!(resolver.resolve("202").await, "Job 202");
    }

    #[tokio::test]
    async fn failed_fetch_caches_fallback_permanently() {
        let jobs = Arc::new(MockJobs::new());
        jobs.fail_from_now_on();
        let resolver = NameResolver::new(jobs.clone());

        assert_eq!(resolver.resolve("303").await, "Job 303");
        assert_eq!(resolver.resolve("303").await, "Job 303");
        // The fallback is cached, so the second resolution makes no call even
        // though the source is still failing.
        assert_eq!(jobs.fetch_calls(), vec!["303".to_string()]);
    }
}
