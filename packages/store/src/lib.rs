pub mod messages;
pub mod models;
pub mod tags;

pub use models::{
    is_post_owned_by, BlogPost, NewProfile, Note, NoteInput, PostInput, PostView, Profile,
    ProfileName, Registration, UserInfo, UNKNOWN_AUTHOR,
};
pub use tags::{format_tags, parse_tags};
