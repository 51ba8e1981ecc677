use store::messages::FORBIDDEN;
use store::{format_tags, is_post_owned_by, Note, PostView};

/// Text and tag fields of the note add/edit forms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoteDraft {
    pub text: String,
    pub tag: String,
}

/// The `/notes` page: the loaded notes, the search box and the open form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotesBoard {
    pub notes: Vec<Note>,
    pub search: String,
    pub draft: NoteDraft,
    /// Id of the note being edited; `None` while the draft is a new note.
    pub editing: Option<String>,
    pub error: Option<String>,
}

impl NotesBoard {
    pub const EMPTY: &'static str = "No notes found. Create one to get started!";

    /// Notes whose text contains the search query, ignoring case.
    pub fn visible(&self) -> Vec<&Note> {
        let query = self.search.to_lowercase();
        self.notes
            .iter()
            .filter(|note| note.text.to_lowercase().contains(&query))
            .collect()
    }

    pub fn start_edit(&mut self, note: &Note) {
        self.editing = Some(note.id.clone());
        self.draft = NoteDraft {
            text: note.text.clone(),
            tag: note.tag.clone(),
        };
        self.error = None;
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.draft = NoteDraft::default();
    }

    /// Put a created or updated note in place and close the form.
    pub fn saved(&mut self, note: Note) {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note,
            None => self.notes.push(note),
        }
        self.cancel_edit();
        self.error = None;
    }

    pub fn removed(&mut self, id: &str) {
        self.notes.retain(|note| note.id != id);
        if self.editing.as_deref() == Some(id) {
            self.cancel_edit();
        }
    }
}

/// Title, description and raw tag input of the post add/edit forms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub tags: String,
}

/// The `/posts` page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostsBoard {
    pub posts: Vec<PostView>,
    pub search: String,
    pub draft: PostDraft,
    pub editing: Option<String>,
    pub error: Option<String>,
}

impl PostsBoard {
    pub const EMPTY: &'static str = "No blog posts found. Create one to get started!";

    /// Posts whose title contains the search query, ignoring case.
    pub fn visible(&self) -> Vec<&PostView> {
        let query = self.search.to_lowercase();
        self.posts
            .iter()
            .filter(|view| view.post.title.to_lowercase().contains(&query))
            .collect()
    }

    /// Whether `user_id` may see the edit and delete controls of `view`.
    pub fn can_manage(view: &PostView, user_id: Option<&str>) -> bool {
        user_id.is_some_and(|user_id| is_post_owned_by(&view.post.author, user_id))
    }

    pub fn start_edit(&mut self, view: &PostView) {
        self.editing = Some(view.post.id.clone());
        self.draft = PostDraft {
            title: view.post.title.clone(),
            description: view.post.description.clone(),
            tags: format_tags(&view.post.tag),
        };
        self.error = None;
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.draft = PostDraft::default();
    }

    /// Put a saved post in place. New posts go first, matching the
    /// newest-first listing.
    pub fn saved(&mut self, view: PostView) {
        match self.posts.iter_mut().find(|p| p.post.id == view.post.id) {
            Some(existing) => *existing = view,
            None => self.posts.insert(0, view),
        }
        self.cancel_edit();
        self.error = None;
    }

    pub fn removed(&mut self, id: &str) {
        self.posts.retain(|view| view.post.id != id);
        if self.editing.as_deref() == Some(id) {
            self.cancel_edit();
        }
    }

    pub fn edit_failed(&mut self, error: &str) {
        self.error = Some(if error.contains(FORBIDDEN) {
            "You have no permission to edit this post.".into()
        } else {
            error.to_string()
        });
    }

    pub fn delete_failed(&mut self, error: &str) {
        self.error = Some(if error.contains(FORBIDDEN) {
            "You have no permission to delete this post.".into()
        } else {
            error.to_string()
        });
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use store::BlogPost;

    use super::*;

    fn note(id: &str, text: &str) -> Note {
        Note {
            id: id.into(),
            text: text.into(),
            tag: "t".into(),
            created_at: Utc::now(),
        }
    }

    fn post(id: &str, title: &str, author: &str) -> PostView {
        let now = Utc::now();
        BlogPost {
            id: id.into(),
            title: title.into(),
            description: "body".into(),
            tag: vec!["x".into(), "y".into()],
            author: author.into(),
            created: now,
            modified: now,
        }
        .with_author_name("Ada Lovelace")
    }

    #[test]
    fn test_note_search_ignores_case() {
        let board = NotesBoard {
            notes: vec![note("1", "Buy Milk"), note("2", "call mom")],
            search: "milk".into(),
            ..Default::default()
        };
        let visible = board.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "1");
    }

    #[test]
    fn test_note_edit_cycle() {
        let mut board = NotesBoard {
            notes: vec![note("1", "abc"), note("2", "def")],
            ..Default::default()
        };
        board.start_edit(&board.notes[0].clone());
        assert_eq!(board.draft.text, "abc");

        board.saved(note("1", "abc!"));
        assert_eq!(board.notes[0].text, "abc!");
        assert_eq!(board.editing, None);
        assert_eq!(board.draft, NoteDraft::default());

        board.saved(note("3", "ghi"));
        assert_eq!(board.notes.len(), 3);

        board.removed("2");
        let ids: Vec<_> = board.notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn test_post_edit_prefills_tags() {
        let mut board = PostsBoard {
            posts: vec![post("p1", "Hi", "u1")],
            ..Default::default()
        };
        board.start_edit(&board.posts[0].clone());
        assert_eq!(board.draft.tags, "x, y");
        assert_eq!(board.editing.as_deref(), Some("p1"));
    }

    #[test]
    fn test_new_posts_go_first() {
        let mut board = PostsBoard {
            posts: vec![post("p1", "Old", "u1")],
            ..Default::default()
        };
        board.saved(post("p2", "New", "u1"));
        assert_eq!(board.posts[0].post.id, "p2");
        board.search = "OLD".into();
        assert_eq!(board.visible()[0].post.id, "p1");
    }

    #[test]
    fn test_only_author_manages_post() {
        let view = post("p1", "Hi", "u1");
        assert!(PostsBoard::can_manage(&view, Some("u1")));
        assert!(!PostsBoard::can_manage(&view, Some("u2")));
        assert!(!PostsBoard::can_manage(&view, None));
    }

    #[test]
    fn test_forbidden_messages() {
        let mut board = PostsBoard::default();
        board.edit_failed(&format!("error running server function: {FORBIDDEN}"));
        assert_eq!(
            board.error.as_deref(),
            Some("You have no permission to edit this post.")
        );
        board.delete_failed(FORBIDDEN);
        assert_eq!(
            board.error.as_deref(),
            Some("You have no permission to delete this post.")
        );
        board.delete_failed("Record not found");
        assert_eq!(board.error.as_deref(), Some("Record not found"));
    }
}
