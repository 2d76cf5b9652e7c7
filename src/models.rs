use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(alias = "username")]
    pub user_name: String,
    pub password: String,
}

/// A stored command-line snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub id: i32,
    pub how_to: String,
    pub line: String,
    pub platform: String,
}

/// What clients see when reading a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReadDto {
    pub id: i32,
    pub how_to: String,
    pub line: String,
}

impl From<Command> for CommandReadDto {
    fn from(command: Command) -> Self {
        Self {
            id: command.id,
            how_to: command.how_to,
            line: command.line,
        }
    }
}

/// Body of create and update requests. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommandWriteDto {
    #[validate(length(min = 1, max = 250))]
    pub how_to: String,
    #[validate(length(min = 1))]
    pub line: String,
    #[validate(length(min = 1))]
    pub platform: String,
}
