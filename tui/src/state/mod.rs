mod app;
mod tab;

pub use app::{Action, AppState, HostEvent};
pub use tab::Tab;
