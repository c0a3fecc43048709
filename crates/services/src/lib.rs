#![forbid(unsafe_code)]

pub mod error;
pub mod gateway;
pub mod remote;
pub mod sessions;
pub mod wire;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{GatewayError, SessionError};
pub use gateway::{StoreGateway, SubmissionGateway};
pub use remote::{RemoteConfig, RemoteGateway};

pub use sessions::{
    AdvanceOutcome, QuizLoopService, QuizSession, ReviewFeed, SessionProgress, SessionState,
};
