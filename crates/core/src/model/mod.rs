pub mod layout;
pub mod session;
pub mod state;

pub use layout::{PageLayout, SectionSpan};
pub use session::{Activation, PageSession};
pub use state::{PageSnapshot, PageState};
