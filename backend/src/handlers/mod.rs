pub mod catalog;
pub mod fairness;
pub mod listings;
pub mod messages;
pub mod offers;
pub mod profiles;
pub mod relay;
