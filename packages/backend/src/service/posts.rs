use store::{parse_tags, PostInput, PostView, Profile, UNKNOWN_AUTHOR};

use super::{Service, POSTS_ROUTE};
use crate::error::{BackendError, Result};

/// Raw post form fields; `tags` is the comma-separated input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostForm {
    pub title: String,
    pub description: String,
    pub tags: String,
}

impl PostForm {
    fn into_input(self) -> Result<PostInput> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(BackendError::Validation("Post title is required".into()));
        }
        Ok(PostInput {
            title,
            description: self.description,
            tag: parse_tags(&self.tags),
        })
    }
}

impl Service {
    /// All posts, newest first, with author names. Served from the `/posts`
    /// route cache.
    pub async fn fetch_posts(&self) -> Result<Vec<PostView>> {
        self.posts_page
            .get_or_load(|| self.backend.list_posts())
            .await
    }

    pub async fn fetch_post(&self, id: &str) -> Result<Option<PostView>> {
        self.backend.get_post(id).await
    }

    pub async fn fetch_post_author_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        self.backend.get_profile_by_user(user_id).await
    }

    /// Create a post authored by `user_id`.
    pub async fn create_post(&self, user_id: &str, form: PostForm) -> Result<PostView> {
        let input = form.into_input()?;
        let post = self
            .backend
            .insert_post(user_id, input)
            .await
            .inspect_err(|e| tracing::error!("Error creating post: {e}"))?;
        self.revalidate_path(POSTS_ROUTE);
        self.joined(post.id.clone(), || post.with_author_name(UNKNOWN_AUTHOR))
            .await
    }

    /// Update a post on behalf of `user_id`, who must be its author.
    pub async fn update_post(&self, user_id: &str, id: &str, form: PostForm) -> Result<PostView> {
        let input = form.into_input()?;
        let post = self
            .backend
            .update_post(user_id, id, input)
            .await
            .inspect_err(|e| match e {
                BackendError::Forbidden => {
                    tracing::warn!(%user_id, post = %id, "No permission to edit this post")
                }
                _ => tracing::error!("Error updating post {id}: {e}"),
            })?;
        self.revalidate_path(POSTS_ROUTE);
        self.joined(post.id.clone(), || post.with_author_name(UNKNOWN_AUTHOR))
            .await
    }

    /// Delete a post on behalf of `user_id`, who must be its author.
    pub async fn delete_post(&self, user_id: &str, id: &str) -> Result<()> {
        self.backend
            .delete_post(user_id, id)
            .await
            .inspect_err(|e| match e {
                BackendError::Forbidden => {
                    tracing::warn!(%user_id, post = %id, "No permission to delete this post")
                }
                _ => tracing::error!("Unable to delete post {id}: {e}"),
            })?;
        self.revalidate_path(POSTS_ROUTE);
        Ok(())
    }

    // Re-read through the backend's join so the author name matches listings.
    async fn joined(&self, id: String, fallback: impl FnOnce() -> PostView) -> Result<PostView> {
        Ok(self.backend.get_post(&id).await?.unwrap_or_else(fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing;
    use store::{is_post_owned_by, Registration};

    fn form(title: &str, tags: &str) -> PostForm {
        PostForm {
            title: title.into(),
            description: "World".into(),
            tags: tags.into(),
        }
    }

    async fn register(service: &Service, username: &str, first: &str) -> String {
        service
            .register(Registration {
                username: username.into(),
                first_name: first.into(),
                last_name: "Tester".into(),
                email: format!("{username}@example.com"),
                password: "secret1".into(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_created_post_lists_with_author_and_tags() {
        let service = testing::service();
        let u1 = register(&service, "alice", "Alice").await;

        let created = service.create_post(&u1, form("Hi", "x,y")).await.unwrap();
        assert_eq!(created.author_name, "Alice Tester");

        let posts = service.fetch_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].post.title, "Hi");
        assert_eq!(posts[0].post.description, "World");
        assert_eq!(posts[0].post.tag, vec!["x", "y"]);
        assert_eq!(posts[0].post.author, u1);
        assert_eq!(posts[0].author_name, "Alice Tester");
    }

    #[tokio::test]
    async fn test_tags_are_trimmed_in_order() {
        let service = testing::service();
        let u1 = register(&service, "alice", "Alice").await;
        let post = service.create_post(&u1, form("Tags", "a, b ,c")).await.unwrap();
        assert_eq!(post.post.tag, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_non_author_cannot_edit_or_delete() {
        let service = testing::service();
        let u1 = register(&service, "alice", "Alice").await;
        let u2 = register(&service, "bobby", "Bob").await;
        let post = service.create_post(&u1, form("Hi", "x")).await.unwrap();

        assert!(matches!(
            service.update_post(&u2, &post.post.id, form("Mine now", "")).await,
            Err(BackendError::Forbidden)
        ));
        assert!(matches!(
            service.delete_post(&u2, &post.post.id).await,
            Err(BackendError::Forbidden)
        ));
        let stored = service.fetch_post(&post.post.id).await.unwrap().unwrap();
        assert_eq!(stored, post);

        let edited = service
            .update_post(&u1, &post.post.id, form("Hello", "z"))
            .await
            .unwrap();
        assert_eq!(edited.post.title, "Hello");
        assert_eq!(edited.author_name, "Alice Tester");
        assert_eq!(service.fetch_posts().await.unwrap()[0].post.title, "Hello");

        service.delete_post(&u1, &post.post.id).await.unwrap();
        assert!(service.fetch_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_author_is_rejected() {
        let service = testing::service();
        assert!(matches!(
            service.create_post("nobody", form("Hi", "")).await,
            Err(BackendError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_author_profile_lookup() {
        let service = testing::service();
        let u1 = register(&service, "alice", "Alice").await;
        let profile = service.fetch_post_author_profile(&u1).await.unwrap().unwrap();
        assert_eq!(profile.username, "alice");
        assert!(is_post_owned_by(&u1, &profile.user_id));
        assert!(!is_post_owned_by("someone-else", &profile.user_id));
    }
}
