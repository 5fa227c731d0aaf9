pub mod application;
pub mod competence;
pub mod user;
pub mod years;

pub use years::YearsOfExperience;
