// Server module entry
// Listener creation, connection handling and accept loops

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use connection::ServiceKind;
pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;
pub use signal::wait_for_shutdown;
