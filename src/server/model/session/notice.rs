use tower_sessions::Session;

use crate::{model::notice::NoticeDto, server::error::Error};

pub const SESSION_NOTICE_KEY: &str = "passerelle:notice";

/// Flash notice kept in session until the next document is rendered.
pub struct SessionNotice;

impl SessionNotice {
    /// Store `notice`, replacing any notice not yet shown
    pub async fn insert(session: &Session, notice: NoticeDto) -> Result<(), Error> {
        session.insert(SESSION_NOTICE_KEY, notice).await?;

        Ok(())
    }

    /// Remove and return the pending notice
    pub async fn pop(session: &Session) -> Result<Option<NoticeDto>, Error> {
        Ok(session.remove::<NoticeDto>(SESSION_NOTICE_KEY).await?)
    }
}

#[cfg(test)]
mod tests {
    use passerelle_test_utils::prelude::*;

    use crate::{model::notice::NoticeDto, server::model::session::notice::SessionNotice};

    /// Expect a notice to be returned once
    #[tokio::test]
    async fn pops_notice_once() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;
        let notice = NoticeDto::success("L'éditeur a été ajouté.");

        SessionNotice::insert(&test.session, notice.clone())
            .await
            .unwrap();

        let first = SessionNotice::pop(&test.session).await.unwrap();
        let second = SessionNotice::pop(&test.session).await.unwrap();

        assert_eq!(first, Some(notice));
        assert_eq!(second, None);

        Ok(())
    }
}
