//! Client session: view model, state machines and the async runtime driving them

pub mod controller;
pub mod runtime;
pub mod state;
pub mod view;

pub use controller::{Controller, Effect, Event};
pub use runtime::{SessionHandle, SessionRuntime};
pub use state::{DownloadState, FetchState};
pub use view::{Notice, NoticeLevel, QualityOption, ViewModel};
