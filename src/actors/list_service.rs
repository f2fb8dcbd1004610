use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn, Instrument};

use crate::clients::{ListClient, ProductGateway};
use crate::domain::{ListSnapshot, Product, ProductId, ProductPage};
use crate::error::{GatewayError, ListError};
use crate::messages::{ListRequest, ServiceResponse};

type ListResponse = ServiceResponse<ListSnapshot, ListError>;

/// Results reported back to the service by the tasks it spawns.
enum Completion {
    Fetched {
        generation: u64,
        outcome: Result<Fetched, GatewayError>,
    },
    Deleted {
        id: ProductId,
        outcome: Result<(), GatewayError>,
        respond_to: ListResponse,
    },
}

enum Fetched {
    Page { page: u32, size: u32, content: ProductPage },
    Search { query: String, results: Vec<Product> },
}

/// The one fetch whose result may still be applied.
struct PendingFetch {
    generation: u64,
    respond_to: Option<ListResponse>,
}

enum Event {
    Request(Option<ListRequest>),
    Completion(Completion),
}

/// Owns the product table: current page, rows, total and search query.
///
/// Page loads and searches run on spawned tasks tagged with a generation.
/// Starting a new one supersedes the pending one, and results from older
/// generations are dropped on arrival, so the rows never fall back to an
/// older page.
pub struct ListService {
    receiver: mpsc::Receiver<ListRequest>,
    completion_sender: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    gateway: ProductGateway,
    state: ListSnapshot,
    publisher: watch::Sender<ListSnapshot>,
    generation: u64,
    pending: Option<PendingFetch>,
}

impl ListService {
    pub fn new(buffer_size: usize, gateway: ProductGateway, page_size: u32) -> (Self, ListClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completion_sender, completions) = mpsc::unbounded_channel();
        let state = ListSnapshot::new(page_size.max(1));
        let (publisher, _) = watch::channel(state.clone());
        let service = Self {
            receiver,
            completion_sender,
            completions,
            gateway,
            state,
            publisher,
            generation: 0,
            pending: None,
        };
        (service, ListClient::new(sender))
    }

    /// Loads the first page, then serves requests until every client is gone.
    #[instrument(name = "list_service", skip(self))]
    pub async fn run(mut self) {
        info!("ListService starting");
        let size = self.state.page_size;
        self.start_page_load(0, size, None);

        loop {
            let event = tokio::select! {
                request = self.receiver.recv() => Event::Request(request),
                Some(completion) = self.completions.recv() => Event::Completion(completion),
            };
            match event {
                Event::Request(Some(request)) => self.handle_request(request),
                Event::Request(None) => break,
                Event::Completion(completion) => self.handle_completion(completion),
            }
        }
        info!("ListService stopped");
    }

    fn handle_request(&mut self, request: ListRequest) {
        match request {
            ListRequest::LoadPage { page, size, respond_to } => {
                if let Err(e) = check_page_size(size) {
                    let _ = respond_to.send(Err(e));
                    return;
                }
                self.start_page_load(page, size, Some(respond_to));
            }
            ListRequest::PageChanged { page, size, respond_to } => {
                self.handle_page_changed(page, size, respond_to);
            }
            ListRequest::SearchInput { query, respond_to } => {
                self.handle_search_input(query, respond_to);
            }
            ListRequest::DeleteRequested { id, respond_to } => {
                self.handle_delete_requested(id, respond_to);
            }
            ListRequest::EditCompleted { saved, respond_to } => {
                self.handle_edit_completed(saved, respond_to);
            }
            ListRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.state.clone()));
            }
            ListRequest::Subscribe { respond_to } => {
                let _ = respond_to.send(Ok(self.publisher.subscribe()));
            }
        }
    }

    #[instrument(skip(self, respond_to))]
    fn handle_page_changed(&mut self, page: u32, size: u32, respond_to: ListResponse) {
        if let Err(e) = check_page_size(size) {
            let _ = respond_to.send(Err(e));
            return;
        }
        if self.state.is_searching() {
            warn!("Page change ignored while search results are shown");
            let _ = respond_to.send(Err(ListError::SearchActive));
            return;
        }
        self.start_page_load(page, size, Some(respond_to));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_search_input(&mut self, query: String, respond_to: ListResponse) {
        let query = query.trim();
        if query.is_empty() {
            // Clearing the search always goes back to the first page.
            debug!("Empty query, reloading first page");
            let size = self.state.page_size;
            self.start_page_load(0, size, Some(respond_to));
            return;
        }

        let query = query.to_string();
        let generation = self.begin_fetch(Some(respond_to));
        let gateway = self.gateway.clone();
        let completions = self.completion_sender.clone();
        tokio::spawn(
            async move {
                let outcome = gateway
                    .search(query.clone())
                    .await
                    .map(|results| Fetched::Search { query, results });
                let _ = completions.send(Completion::Fetched { generation, outcome });
            }
            .in_current_span(),
        );
    }

    #[instrument(skip(self, respond_to))]
    fn handle_delete_requested(&mut self, id: ProductId, respond_to: ListResponse) {
        debug!("Processing delete request");
        let gateway = self.gateway.clone();
        let completions = self.completion_sender.clone();
        tokio::spawn(
            async move {
                let outcome = gateway.delete(id).await;
                let _ = completions.send(Completion::Deleted { id, outcome, respond_to });
            }
            .in_current_span(),
        );
    }

    #[instrument(skip(self, respond_to))]
    fn handle_edit_completed(&mut self, saved: bool, respond_to: ListResponse) {
        if !saved {
            debug!("Dialog closed without saving");
            let _ = respond_to.send(Ok(self.state.clone()));
            return;
        }
        let size = self.state.page_size;
        self.start_page_load(0, size, Some(respond_to));
    }

    #[instrument(skip(self, respond_to))]
    fn start_page_load(&mut self, page: u32, size: u32, respond_to: Option<ListResponse>) {
        let generation = self.begin_fetch(respond_to);
        let gateway = self.gateway.clone();
        let completions = self.completion_sender.clone();
        tokio::spawn(
            async move {
                let outcome = gateway
                    .list(page, size)
                    .await
                    .map(|content| Fetched::Page { page, size, content });
                let _ = completions.send(Completion::Fetched { generation, outcome });
            }
            .in_current_span(),
        );
    }

    /// Registers a new fetch as the only one allowed to land.
    fn begin_fetch(&mut self, respond_to: Option<ListResponse>) -> u64 {
        self.generation += 1;
        if let Some(stale) = self.pending.take() {
            debug!(generation = stale.generation, "Superseding pending fetch");
            if let Some(respond_to) = stale.respond_to {
                let _ = respond_to.send(Err(ListError::Superseded));
            }
        }
        self.pending = Some(PendingFetch {
            generation: self.generation,
            respond_to,
        });
        self.generation
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Fetched { generation, outcome } => self.finish_fetch(generation, outcome),
            Completion::Deleted { id, outcome, respond_to } => self.finish_delete(id, outcome, respond_to),
        }
    }

    #[instrument(skip(self, outcome))]
    fn finish_fetch(&mut self, generation: u64, outcome: Result<Fetched, GatewayError>) {
        let current = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.generation == generation);
        if !current {
            debug!("Discarding stale result");
            return;
        }
        let respond_to = self.pending.take().and_then(|pending| pending.respond_to);

        let result = match outcome {
            Ok(Fetched::Page { page, size, content }) => {
                self.state.apply_page(page, size, content);
                info!(page, total = self.state.total_count, rows = self.state.items.len(), "Page loaded");
                self.publish();
                Ok(self.state.clone())
            }
            Ok(Fetched::Search { query, results }) => {
                info!(%query, rows = results.len(), "Search results loaded");
                self.state.apply_search(query, results);
                self.publish();
                Ok(self.state.clone())
            }
            Err(e) => Err(ListError::from(e)),
        };
        if let Some(respond_to) = respond_to {
            let _ = respond_to.send(result);
        }
    }

    #[instrument(skip(self, outcome, respond_to))]
    fn finish_delete(&mut self, id: ProductId, outcome: Result<(), GatewayError>, respond_to: ListResponse) {
        let result = match outcome {
            Ok(()) => {
                self.state.remove(id);
                info!("Product removed from list");
                self.publish();
                Ok(self.state.clone())
            }
            Err(e) => Err(ListError::from(e)),
        };
        let _ = respond_to.send(result);
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }
}

fn check_page_size(size: u32) -> Result<(), ListError> {
    if size == 0 {
        warn!("Rejecting empty page size");
        return Err(ListError::InvalidPageSize);
    }
    Ok(())
}
