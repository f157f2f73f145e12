#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("storage quota exceeded: {attempted}-byte write against a {capacity}-byte capacity")]
    QuotaExceeded { attempted: usize, capacity: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
