use thiserror::Error;

use mc_api_types::TaskStatus;
use mc_client::ClientError;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("task {0} not found")]
    TaskNotFound(String),

    #[error("recurring task {0} not found")]
    RecurringNotFound(String),

    #[error("cannot move task from {} to {}", from.label(), to.label())]
    InvalidTransition { from: TaskStatus, to: TaskStatus },

    #[error("a reviewer must be chosen before a task enters review")]
    ReviewerRequired,

    #[error("task is not in review")]
    NotInReview,
}
