//! Tracking Middlewares
//!
//! Counting and history recording as operation wrappers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::store::KeyValueStore;
use crate::tracking::{inputs_key, outputs_key, Operation};

// == Counting Middleware ==
/// Increments `<name>` before every call of the inner operation.
#[derive(Debug, Clone)]
pub struct CountingMiddleware<O> {
    inner: O,
}

impl<O> CountingMiddleware<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<O: Operation> Operation for CountingMiddleware<O> {
    type Input = O::Input;
    type Output = O::Output;

    fn qualified_name(&self) -> &str {
        self.inner.qualified_name()
    }

    fn store(&self) -> &Arc<dyn KeyValueStore> {
        self.inner.store()
    }

    async fn invoke(&self, input: Self::Input) -> Result<Self::Output> {
        let calls = self.store().incr(self.qualified_name()).await?;
        debug!(operation = self.qualified_name(), calls, "Counted call");
        self.inner.invoke(input).await
    }
}

// == History Middleware ==
/// Records the rendered input before, and the rendered output after, every call.
///
/// A failing call leaves its input without a matching output.
#[derive(Debug, Clone)]
pub struct HistoryMiddleware<O> {
    inner: O,
}

impl<O> HistoryMiddleware<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<O: Operation> Operation for HistoryMiddleware<O> {
    type Input = O::Input;
    type Output = O::Output;

    fn qualified_name(&self) -> &str {
        self.inner.qualified_name()
    }

    fn store(&self) -> &Arc<dyn KeyValueStore> {
        self.inner.store()
    }

    async fn invoke(&self, input: Self::Input) -> Result<Self::Output> {
        let name = self.qualified_name();
        let rendered_input = format!("{:?}", input);
        self.store()
            .rpush(&inputs_key(name), rendered_input.as_bytes())
            .await?;

        let output = self.inner.invoke(input).await?;

        let rendered_output = output.to_string();
        self.store()
            .rpush(&outputs_key(name), rendered_output.as_bytes())
            .await?;
        debug!(
            operation = name,
            input = %rendered_input,
            output = %rendered_output,
            "Recorded call"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::store::MemoryStore;
    use crate::tracking::call_count;

    /// Doubles its argument, failing on negative input.
    struct Double {
        store: Arc<dyn KeyValueStore>,
    }

    #[async_trait]
    impl Operation for Double {
        type Input = (i64,);
        type Output = i64;

        fn qualified_name(&self) -> &str {
            "Double::call"
        }

        fn store(&self) -> &Arc<dyn KeyValueStore> {
            &self.store
        }

        async fn invoke(&self, input: Self::Input) -> Result<Self::Output> {
            if input.0 < 0 {
                return Err(CacheError::Decode("negative".to_string()));
            }
            Ok(input.0 * 2)
        }
    }

    fn double(store: &Arc<dyn KeyValueStore>) -> Double {
        Double {
            store: store.clone(),
        }
    }

    async fn list(store: &Arc<dyn KeyValueStore>, key: &str) -> Vec<String> {
        store
            .lrange(key, 0, -1)
            .await
            .unwrap()
            .into_iter()
            .map(|raw| String::from_utf8(raw).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_counting_middleware() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let op = CountingMiddleware::new(double(&store));

        assert_eq!(op.invoke((2,)).await.unwrap(), 4);
        assert_eq!(op.invoke((5,)).await.unwrap(), 10);

        assert_eq!(call_count(&op).await.unwrap(), 2);
        assert!(list(&store, "Double::call:inputs").await.is_empty());
    }

    #[tokio::test]
    async fn test_history_middleware() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let op = HistoryMiddleware::new(double(&store));

        op.invoke((2,)).await.unwrap();
        op.invoke((7,)).await.unwrap();

        assert_eq!(list(&store, "Double::call:inputs").await, vec!["(2,)", "(7,)"]);
        assert_eq!(list(&store, "Double::call:outputs").await, vec!["4", "14"]);
        assert_eq!(call_count(&op).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_composed_middlewares_share_name() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let op = CountingMiddleware::new(HistoryMiddleware::new(double(&store)));

        assert_eq!(op.qualified_name(), "Double::call");
        assert_eq!(op.inner().inner().qualified_name(), "Double::call");

        for n in 0..3 {
            op.invoke((n,)).await.unwrap();
        }

        assert_eq!(call_count(&op).await.unwrap(), 3);
        assert_eq!(list(&store, "Double::call:inputs").await.len(), 3);
        assert_eq!(list(&store, "Double::call:outputs").await, vec!["0", "2", "4"]);
    }

    #[tokio::test]
    async fn test_failed_call_leaves_orphan_input() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let op = CountingMiddleware::new(HistoryMiddleware::new(double(&store)));

        op.invoke((1,)).await.unwrap();
        let result = op.invoke((-1,)).await;
        assert!(matches!(result, Err(CacheError::Decode(_))));

        assert_eq!(call_count(&op).await.unwrap(), 2);
        assert_eq!(list(&store, "Double::call:inputs").await, vec!["(1,)", "(-1,)"]);
        assert_eq!(list(&store, "Double::call:outputs").await, vec!["2"]);
    }
}
