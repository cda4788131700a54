pub mod capture;
pub mod classifier;
pub mod config;
pub mod executor;
pub mod fixture;
pub mod reporter;
pub mod resolution;
pub mod scenario;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod wait;

pub use dirprobe_common as common;
pub use dirprobe_common::{
    CandidateList, DriverError, ElementHandle, Locator, NavigationResult, PageState, PhraseSet,
    Strategy, Verdict,
};
