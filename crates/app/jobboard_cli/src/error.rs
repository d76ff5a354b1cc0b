use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),

    #[error("Store: {}", .0)]
    Store(#[from] jobboard_core::store::StoreError),

    #[error("Seed: {}", .0)]
    Seed(#[from] jobboard_core::seed::SeedError),
}
