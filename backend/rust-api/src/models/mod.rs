pub mod attempt;
pub mod chapter;
pub mod response;

pub use attempt::Attempt;
pub use chapter::{Chapter, Question};
pub use response::{GradedResponse, ReportEntry, Response};
