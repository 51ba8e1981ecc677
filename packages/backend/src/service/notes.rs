use store::{Note, NoteInput};

use super::{Service, NOTES_ROUTE};
use crate::error::{BackendError, Result};

impl Service {
    /// All notes, oldest first. Served from the `/notes` route cache.
    pub async fn fetch_notes(&self) -> Result<Vec<Note>> {
        self.notes_page
            .get_or_load(|| self.backend.list_notes())
            .await
    }

    pub async fn fetch_note(&self, id: &str) -> Result<Option<Note>> {
        self.backend.get_note(id).await
    }

    pub async fn create_note(&self, input: NoteInput) -> Result<Note> {
        let input = validate(input)?;
        let note = self.backend.insert_note(input).await.inspect_err(|e| {
            tracing::error!("Error inserting note: {e}");
        })?;
        self.revalidate_path(NOTES_ROUTE);
        Ok(note)
    }

    pub async fn update_note(&self, id: &str, input: NoteInput) -> Result<Note> {
        let input = validate(input)?;
        let note = self.backend.update_note(id, input).await.inspect_err(|e| {
            tracing::error!("Error updating note {id}: {e}");
        })?;
        self.revalidate_path(NOTES_ROUTE);
        Ok(note)
    }

    pub async fn delete_note(&self, id: &str) -> Result<()> {
        self.backend.delete_note(id).await.inspect_err(|e| {
            tracing::error!("Unable to delete note {id}: {e}");
        })?;
        self.revalidate_path(NOTES_ROUTE);
        Ok(())
    }
}

fn validate(input: NoteInput) -> Result<NoteInput> {
    if input.text.trim().is_empty() {
        return Err(BackendError::Validation("Note text is required".into()));
    }
    Ok(NoteInput {
        text: input.text,
        tag: input.tag.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing;

    fn note(text: &str) -> NoteInput {
        NoteInput {
            text: text.into(),
            tag: " work ".into(),
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let service = testing::service();

        let created = service.create_note(note("abc")).await.unwrap();
        assert_eq!(created.tag, "work");

        let notes = service.fetch_notes().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "abc");
        assert_eq!(service.fetch_note(&created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let service = testing::service();
        assert!(matches!(
            service.create_note(note("   ")).await,
            Err(BackendError::Validation(_))
        ));
        assert!(service.fetch_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_revalidate_listing() {
        let service = testing::service();
        let first = service.create_note(note("one")).await.unwrap();
        assert_eq!(service.fetch_notes().await.unwrap().len(), 1);

        // Writes that bypass the service are invisible until revalidation.
        service.backend().insert_note(note("sneaky")).await.unwrap();
        assert_eq!(service.fetch_notes().await.unwrap().len(), 1);

        service.update_note(&first.id, note("uno")).await.unwrap();
        let notes = service.fetch_notes().await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].text, "uno");
    }

    #[tokio::test]
    async fn test_delete_removes_only_that_note() {
        let service = testing::service();
        let a = service.create_note(note("a")).await.unwrap();
        let b = service.create_note(note("b")).await.unwrap();
        let c = service.create_note(note("c")).await.unwrap();
        service.fetch_notes().await.unwrap();

        service.delete_note(&b.id).await.unwrap();

        let ids: Vec<String> = service
            .fetch_notes()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![a.id, c.id]);
        assert!(matches!(
            service.delete_note(&b.id).await,
            Err(BackendError::NotFound)
        ));
    }
}
