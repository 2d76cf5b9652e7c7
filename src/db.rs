use crate::models::{Command, CommandWriteDto};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Storage for commands, addressed by id.
#[async_trait]
pub trait CommandRepo: Send + Sync {
    async fn list(&self) -> Vec<Command>;
    async fn get(&self, id: i32) -> Option<Command>;
    async fn create(&self, new: CommandWriteDto) -> Command;
    /// Returns `false` when no command has this id.
    async fn update(&self, id: i32, changes: CommandWriteDto) -> bool;
    /// Returns `false` when no command has this id.
    async fn delete(&self, id: i32) -> bool;
}

#[derive(Default)]
struct Table {
    rows: BTreeMap<i32, Command>,
    next_id: i32,
}

#[derive(Default)]
pub struct InMemoryCommandRepo {
    table: RwLock<Table>,
}

impl InMemoryCommandRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the three sample commands, ids 0 to 2.
    pub fn with_fixture() -> Self {
        let rows: BTreeMap<i32, Command> = [
            ("First command", "Item1", "Platform1"),
            ("Second command", "Item2", "Platform2"),
            ("Third command", "Item3", "Platform3"),
        ]
        .into_iter()
        .zip(0..)
        .map(|((how_to, line, platform), id)| {
            let command = Command {
                id,
                how_to: how_to.to_string(),
                line: line.to_string(),
                platform: platform.to_string(),
            };
            (id, command)
        })
        .collect();
        let next_id = rows.len() as i32;
        Self {
            table: RwLock::new(Table { rows, next_id }),
        }
    }
}

#[async_trait]
impl CommandRepo for InMemoryCommandRepo {
    async fn list(&self) -> Vec<Command> {
        self.table.read().await.rows.values().cloned().collect()
    }

    async fn get(&self, id: i32) -> Option<Command> {
        self.table.read().await.rows.get(&id).cloned()
    }

    async fn create(&self, new: CommandWriteDto) -> Command {
        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id += 1;
        let command = Command {
            id,
            how_to: new.how_to,
            line: new.line,
            platform: new.platform,
        };
        table.rows.insert(id, command.clone());
        command
    }

    async fn update(&self, id: i32, changes: CommandWriteDto) -> bool {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(command) => {
                command.how_to = changes.how_to;
                command.line = changes.line;
                command.platform = changes.platform;
                true
            }
            None => false,
        }
    }

    async fn delete(&self, id: i32) -> bool {
        self.table.write().await.rows.remove(&id).is_some()
    }
}
