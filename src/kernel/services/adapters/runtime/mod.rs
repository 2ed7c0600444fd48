//! Async runtime adapter: executes IO effects and sends completion messages
//! back to the app loop.

mod message;
mod runtime;

pub use message::AppMessage;
pub use runtime::AsyncRuntime;
