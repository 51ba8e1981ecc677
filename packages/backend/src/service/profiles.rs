use store::ProfileName;

use super::Service;
use crate::error::Result;

impl Service {
    /// Name projection of every profile, used to resolve author names.
    pub async fn fetch_all_profiles(&self) -> Result<Vec<ProfileName>> {
        self.backend
            .list_profile_names()
            .await
            .inspect_err(|e| tracing::error!("Error fetching profiles: {e}"))
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        self.backend.username_exists(username.trim()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::service::testing;
    use store::Registration;

    #[tokio::test]
    async fn test_profiles_resolve_author_names() {
        let service = testing::service();
        assert!(service.fetch_all_profiles().await.unwrap().is_empty());
        assert!(!service.username_exists("ada").await.unwrap());

        let user = service
            .register(Registration {
                username: "ada".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: "ada@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();

        assert!(service.username_exists("ada").await.unwrap());
        assert!(service.username_exists(" ada ").await.unwrap());

        let names = service.fetch_all_profiles().await.unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].user_id, user.id);
        assert_eq!(names[0].full_name(), "Ada Lovelace");
    }
}
