pub mod ask;
pub mod chat;
pub mod feedback;
