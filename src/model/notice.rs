use serde::{Deserialize, Serialize};

/// Flash notice shown once after a mutating action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NoticeDto {
    /// `success`, `warning` or `danger`
    pub scheme: String,
    pub header: String,
    pub body: Option<String>,
    pub actions: Vec<NoticeActionDto>,
}

/// Button attached to a notice, e.g. the "Annuler" action restoring discarded records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NoticeActionDto {
    pub label: String,
    pub method: String,
    pub url: String,
    pub params: serde_json::Value,
}

impl NoticeDto {
    pub fn success(header: impl Into<String>) -> Self {
        Self {
            scheme: "success".to_string(),
            header: header.into(),
            body: None,
            actions: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_action(mut self, action: NoticeActionDto) -> Self {
        self.actions.push(action);
        self
    }
}
