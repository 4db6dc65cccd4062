use tower_sessions::Session;

/// Session key written by the auth surface on login.
pub const USER_ID_KEY: &str = "user_id";

pub async fn get_current_user_id(session: &Session) -> Option<String> {
    match session.get::<String>(USER_ID_KEY).await {
        Ok(Some(user_id)) if !user_id.trim().is_empty() => Some(user_id),
        Ok(Some(_)) => {
            log::warn!("Session has an empty user_id");
            None
        }
        Ok(None) => None,
        Err(e) => {
            log::error!("Failed to get user_id from session: {}", e);
            None
        }
    }
}
