use crate::cache::{PageCache, PageContent};
use crate::fetch::{FetchSettings, Fetcher, fetch_page};
use crate::logging::DiagnosticLog;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;

/// Fixed-size pool of fetch workers that fills a [`PageCache`].
///
/// URLs go onto a task queue tagged with their position, a bounded number of
/// workers drain it, and results come back over a channel. The cache is then
/// built by position, so its order never depends on which fetch finished
/// first. Dropping the future returned by [`ContentPool::fill`] drops the
/// `JoinSet`, which aborts every in-flight fetch.
pub struct ContentPool {
    fetcher: Arc<dyn Fetcher>,
    settings: FetchSettings,
    workers: usize,
    log: DiagnosticLog,
}

impl ContentPool {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        settings: FetchSettings,
        workers: usize,
        log: DiagnosticLog,
    ) -> Self {
        Self {
            fetcher,
            settings,
            workers: workers.max(1),
            log,
        }
    }

    /// Fetch every distinct URL once and cache the outcome in input order
    pub async fn fill(&self, urls: &[String]) -> PageCache {
        let order = distinct(urls);
        if order.is_empty() {
            return PageCache::new();
        }

        // Every task is queued up front, so workers stop once the queue drains
        let (task_tx, task_rx) = mpsc::channel::<(usize, String)>(order.len());
        for (index, url) in order.iter().enumerate() {
            if task_tx.try_send((index, url.clone())).is_err() {
                self.log
                    .error(format_args!("Task queue rejected {}, marking it failed", url));
            }
        }
        drop(task_tx);

        let task_rx = Arc::new(Mutex::new(task_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<(usize, PageContent)>(order.len());

        let num_workers = self.workers.min(order.len());
        let mut workers = JoinSet::new();
        for worker_id in 0..num_workers {
            workers.spawn(run_worker(
                worker_id,
                Arc::clone(&self.fetcher),
                self.settings.clone(),
                Arc::clone(&task_rx),
                result_tx.clone(),
                self.log.clone(),
            ));
        }
        // Workers hold the remaining senders; the loop below ends when they all exit
        drop(result_tx);

        let mut slots: Vec<Option<PageContent>> = vec![None; order.len()];
        while let Some((index, content)) = result_rx.recv().await {
            slots[index] = Some(content);
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                self.log.error(format_args!("Fetch worker ended abnormally: {}", e));
            }
        }

        let mut cache = PageCache::new();
        for (url, slot) in order.into_iter().zip(slots) {
            cache.insert(url, slot.unwrap_or(PageContent::Failed));
        }

        self.log.debug(format_args!(
            "Cached {} pages ({} failed) using {} workers",
            cache.len(),
            cache.failed_count(),
            num_workers
        ));
        cache
    }
}

/// First occurrence of each URL, in input order
fn distinct(urls: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .filter(|url| seen.insert(url.as_str()))
        .cloned()
        .collect()
}

async fn run_worker(
    worker_id: usize,
    fetcher: Arc<dyn Fetcher>,
    settings: FetchSettings,
    tasks: Arc<Mutex<mpsc::Receiver<(usize, String)>>>,
    results: mpsc::Sender<(usize, PageContent)>,
    log: DiagnosticLog,
) {
    log.debug(format_args!("Fetch worker {} started", worker_id));

    loop {
        let next = {
            let mut rx = tasks.lock().await;
            rx.recv().await
        };
        let Some((index, url)) = next else {
            break;
        };

        let content = match fetch_page(fetcher.as_ref(), &url, &settings).await {
            Ok(body) => PageContent::fetched(&body),
            Err(e) => {
                log.error(format_args!("Failed to fetch {}: {}", url, e));
                PageContent::Failed
            }
        };

        if results.send((index, content)).await.is_err() {
            // Receiver is gone, the scan was abandoned
            break;
        }
    }

    log.debug(format_args!("Fetch worker {} finished", worker_id));
}
