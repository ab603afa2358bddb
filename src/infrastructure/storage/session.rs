// Signed-in session persisted between CLI runs
use crate::domain::error::LingoError;
use crate::domain::model::Session;
use std::path::Path;

pub async fn load_session(path: &Path) -> Result<Option<Session>, LingoError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = tokio::fs::read_to_string(path).await?;
    match serde_json::from_str(&content) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            tracing::warn!("Ignoring unreadable session file {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

pub async fn save_session(path: &Path, session: &Session) -> Result<(), LingoError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, serde_json::to_vec_pretty(session)?).await?;
    Ok(())
}

pub async fn clear_session(path: &Path) -> Result<(), LingoError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::User;

    #[tokio::test]
    async fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        assert!(load_session(&path).await.unwrap().is_none());

        let session = Session {
            access_token: "jwt".into(),
            refresh_token: None,
            expires_at: Some(1714557600),
            user: User {
                id: "u1".into(),
                email: Some("a@b.c".into()),
            },
        };
        save_session(&path, &session).await.unwrap();
        assert_eq!(load_session(&path).await.unwrap(), Some(session));

        clear_session(&path).await.unwrap();
        clear_session(&path).await.unwrap();
        assert!(load_session(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, "not json").await.unwrap();
        assert!(load_session(&path).await.unwrap().is_none());
    }
}
