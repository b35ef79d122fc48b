use thiserror::Error;

use crate::domain::Side;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("value not found in tree: {0}")]
    NotFound(i64),

    #[error("invalid tree shape: {reason}")]
    InvalidShape { reason: String },

    #[error("{side} child slot already occupied under node {parent}")]
    SlotOccupied { parent: i64, side: Side },

    #[error("node handle is no longer part of the tree")]
    StaleHandle,

    #[error("config error: {message}")]
    Config { message: String },
}

pub type TreeResult<T> = Result<T, TreeError>;
