//! Page objects. Each one names its targets as candidate lists (most
//! specific locator first) and wraps the common interactions on them.

mod business;
mod category;
mod contact;
mod login;
mod nav;
mod search;

pub use business::{BusinessData, BusinessDetail, BusinessForm};
pub use category::CategoryList;
pub use contact::ContactForm;
pub use login::LoginPage;
pub use nav::NavBar;
pub use search::SearchBar;
