pub mod error;
pub mod formatter;
pub mod locator;
pub mod page;
pub mod phrases;
pub mod verdict;

pub use error::DriverError;
pub use locator::{CandidateList, CandidateListError, Locator, LocatorParseError, Strategy};
pub use page::{ElementHandle, NavigationResult, PageState};
pub use phrases::PhraseSet;
pub use verdict::Verdict;
