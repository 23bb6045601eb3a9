//! Page Components

mod describe;
mod home;
mod questionnaire;
mod status;

pub use describe::DescribePage;
pub use home::HomePage;
pub use questionnaire::QuestionnairePage;
pub use status::StatusPage;
