use crate::core::routing::Route;
use crate::domain::model::Signo;
use crate::domain::ports::SignoApi;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Runs the most recently scheduled job once `delay` has passed without a
/// newer one replacing it.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Results { query: String, signos: Vec<Signo> },
    Failed { query: String, message: String },
}

/// Search-as-you-type over the signo list.
pub struct SearchBox<A: SignoApi + 'static> {
    api: Arc<A>,
    debouncer: Debouncer,
    text: String,
    state: watch::Sender<SearchState>,
}

impl<A: SignoApi + 'static> SearchBox<A> {
    pub fn new(api: Arc<A>, delay: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            api,
            debouncer: Debouncer::new(delay),
            text: String::new(),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Called on every keystroke.
    pub fn on_input(&mut self, text: &str) {
        self.text = text.to_string();
        let query = text.trim().to_string();

        if query.is_empty() {
            self.debouncer.cancel();
            self.state.send_replace(SearchState::Idle);
            return;
        }

        let api = Arc::clone(&self.api);
        let state = self.state.clone();
        self.debouncer.schedule(async move {
            tracing::debug!("🔎 searching for '{}'", query);
            let next = match api.list_signos(Some(&query)).await {
                Ok(signos) => SearchState::Results { query, signos },
                Err(e) => {
                    tracing::warn!("Search for '{}' failed: {}", query, e);
                    SearchState::Failed {
                        query,
                        message: e.user_friendly_message(),
                    }
                }
            };
            state.send_replace(next);
        });
    }

    /// The "Buscar" button: skip the wait and go to the dictionary page.
    pub fn submit(&mut self) -> Route {
        self.debouncer.cancel();
        let query = self.text.trim();
        Route::Diccionario {
            search: (!query.is_empty()).then(|| query.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{signo, InMemoryApi};

    fn api() -> Arc<InMemoryApi> {
        Arc::new(InMemoryApi::new().with_signos(vec![
            signo(1, "Casa", &[]),
            signo(2, "Casamiento", &[]),
            signo(3, "Perro", &[]),
        ]))
    }

    #[tokio::test(start_paused = true)]
    async fn test_queries_only_after_quiet_period() {
        let api = api();
        let mut search = SearchBox::new(Arc::clone(&api), Duration::from_millis(300));
        let mut rx = search.subscribe();

        search.on_input("c");
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.on_input("ca");
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.on_input("casa");

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(api.queries().is_empty());

        rx.changed().await.unwrap();
        assert_eq!(api.queries(), vec![Some("casa".to_string())]);
        match &*rx.borrow() {
            SearchState::Results { query, signos } => {
                assert_eq!(query, "casa");
                assert_eq!(signos.len(), 2);
            }
            other => panic!("unexpected state {:?}", other),
        };
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_cancels_pending_query() {
        let api = api();
        let mut search = SearchBox::new(Arc::clone(&api), Duration::from_millis(300));

        search.on_input("perro");
        assert!(search.is_pending());
        search.on_input("   ");
        assert!(!search.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(api.queries().is_empty());
        assert_eq!(*search.subscribe().borrow(), SearchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_query_is_published() {
        let api = Arc::new(InMemoryApi::new().failing());
        let mut search = SearchBox::new(Arc::clone(&api), Duration::from_millis(300));
        let mut rx = search.subscribe();

        search.on_input("gato");
        rx.changed().await.unwrap();

        assert!(matches!(
            &*rx.borrow(),
            SearchState::Failed { message, .. } if message == "Error HTTP: 500"
        ));
    }

    #[tokio::test]
    async fn test_submit_routes_to_dictionary() {
        let mut search = SearchBox::new(api(), Duration::from_millis(300));
        search.on_input(" buenos días ");

        let route = search.submit();
        assert_eq!(route.path(), "/diccionario?search=buenos%20d%C3%ADas");
        assert!(!search.is_pending());

        search.on_input("");
        assert_eq!(search.submit().path(), "/diccionario");
    }
}
