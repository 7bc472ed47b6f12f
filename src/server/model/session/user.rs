use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use crate::server::error::Error;

pub const SESSION_USER_ID_KEY: &str = "passerelle:user:id";

#[derive(Default, Deserialize, Serialize, Debug)]
pub struct SessionUserId(pub String);

impl SessionUserId {
    /// Insert user ID into session
    pub async fn insert(session: &Session, user_id: Uuid) -> Result<(), Error> {
        session
            .insert(SESSION_USER_ID_KEY, SessionUserId(user_id.to_string()))
            .await?;

        Ok(())
    }

    /// Get user ID from session
    pub async fn get(session: &Session) -> Result<Option<Uuid>, Error> {
        session
            .get::<SessionUserId>(SESSION_USER_ID_KEY)
            .await?
            .map(|SessionUserId(id_str)| {
                Uuid::parse_str(&id_str).map_err(|e| {
                    Error::ParseError(format!("Failed to parse session user id: {}", e))
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    mod insert {
        use passerelle_test_utils::prelude::*;
        use uuid::Uuid;

        use crate::server::model::session::user::SessionUserId;

        /// Expect success when inserting valid user ID into session
        #[tokio::test]
        async fn inserts_user_id() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;

            let result = SessionUserId::insert(&test.session, Uuid::new_v4()).await;

            assert!(result.is_ok());

            Ok(())
        }
    }

    mod get {
        use passerelle_test_utils::prelude::*;
        use uuid::Uuid;

        use crate::server::model::session::user::{SessionUserId, SESSION_USER_ID_KEY};

        /// Expect Some when user ID is present in session
        #[tokio::test]
        async fn returns_inserted_user_id() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;
            let user_id = Uuid::new_v4();
            SessionUserId::insert(&test.session, user_id).await.unwrap();

            let result = SessionUserId::get(&test.session).await;

            assert!(matches!(result, Ok(Some(id)) if id == user_id));

            Ok(())
        }

        /// Expect None when no user ID is present in session
        #[tokio::test]
        async fn returns_none_without_user() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;

            let result = SessionUserId::get(&test.session).await;

            assert!(matches!(result, Ok(None)));

            Ok(())
        }

        /// Expect parse error when user ID inserted into session is not a UUID
        #[tokio::test]
        async fn fails_for_malformed_user_id() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;

            test.session
                .insert(SESSION_USER_ID_KEY, SessionUserId("invalid_id".to_string()))
                .await?;

            let result = SessionUserId::get(&test.session).await;

            assert!(result.is_err());

            Ok(())
        }
    }
}
