use service::training::TrainingStore;

/// Shared handler state; the store wraps a pooled connection and is cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub store: TrainingStore,
}
