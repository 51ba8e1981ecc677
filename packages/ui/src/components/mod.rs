//! Small building blocks shared by the page views.

mod alert;
mod cards;

pub use alert::FormAlert;
pub use cards::{NoteCard, PostCard, TagList};
