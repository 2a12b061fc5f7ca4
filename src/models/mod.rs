pub mod feedback;
pub mod invitation;
pub mod trip;
pub mod user;
