//! WebDriver-backed [`Session`](dirprobe_engine::session::Session).
//!
//! Either connects to an existing WebDriver endpoint or spawns a local
//! chromedriver/geckodriver for the lifetime of the session.

pub mod driver_process;
pub mod registry;
pub mod session;
pub mod webdriver;

pub use session::WebDriverSession;
