use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ChatTemplateResponse {
    pub data: ChatTemplateData,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ChatTemplateData {
    #[serde(rename = "type")]
    pub data_type: String,
    pub attributes: ChatTemplateAttributes,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ChatTemplateAttributes {
    pub templates: Vec<ChatTemplate>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatTemplate {
    pub id: String,
    pub consumer: String,
    pub title: String,
    pub category: String,
    pub message: String,
    pub queues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_disabled: Option<bool>,
}
