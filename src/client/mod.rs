// src/client/mod.rs
// Chat page: view state machine, capability slots, endpoint client and
// the terminal front end

pub mod affordance;
pub mod api;
pub mod page;
pub mod repl;

pub use api::ChatClient;
pub use page::{APOLOGY, ChatPage, Message, PageState};
