/// Await a pipeline stage and log how long it took, whatever the outcome.
///
/// ```ignore
/// let docs = log_stage!("vector_search", self.vector.search(query, 3))?;
/// ```
#[macro_export]
macro_rules! log_stage {
    ($stage:expr, $fut:expr) => {{
        let start = std::time::Instant::now();
        let result = $fut.await;
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => $crate::debug!(stage = $stage, duration_ms, "stage completed"),
            Err(e) => $crate::warn!(stage = $stage, duration_ms, error = %e, "stage failed"),
        }
        result
    }};
}
