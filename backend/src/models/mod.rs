pub mod entry;
pub mod feedback;
pub mod habit;
pub mod personality;
