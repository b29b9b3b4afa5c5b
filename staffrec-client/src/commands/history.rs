//! Undo history
//!
//! A LIFO stack of recorded commands. Undo pops and reverses; a command
//! that fails to reverse is not pushed back, so it is attempted at most
//! once. Id remap pairs produced by a reversal are applied to every
//! command still on the stack before the result is reported.

use tracing::warn;

use crate::commands::Command;
use crate::error::Result;
use crate::storage::StorageApi;

/// Stack of reversible commands, most recent last
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandsHistory {
    commands: Vec<Command>,
}

impl CommandsHistory {
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Reverse the most recent command.
    ///
    /// Returns the (old, new) id pairs produced by the reversal, already
    /// applied to the commands that remain. On failure the command is
    /// dropped rather than retried; any pairs produced before the
    /// failure are still applied.
    pub async fn undo_last(&mut self, storage: &dyn StorageApi) -> Result<Vec<(i64, i64)>> {
        let Some(command) = self.commands.pop() else {
            return Ok(Vec::new());
        };
        let mut remaps = Vec::new();
        let result = command.reverse(storage, &mut remaps).await;
        if !remaps.is_empty() {
            self.remap_ids(&remaps);
        }
        if result.is_err() {
            warn!("undo failed, command dropped from history");
        }
        result.map(|()| remaps)
    }

    /// Reverse every command, most recent first.
    ///
    /// Stops at the first failure, leaving the not-yet-reversed commands
    /// on the stack (with any remaps already applied to them).
    pub async fn undo_all(&mut self, storage: &dyn StorageApi) -> Result<Vec<(i64, i64)>> {
        let mut remaps = Vec::new();
        self.undo_all_into(storage, &mut remaps).await?;
        Ok(remaps)
    }

    /// Shared reversal loop; also runs a nested `Multi` history against
    /// its parent's remap accumulator.
    pub(crate) async fn undo_all_into(
        &mut self,
        storage: &dyn StorageApi,
        remaps: &mut Vec<(i64, i64)>,
    ) -> Result<()> {
        while let Some(command) = self.commands.pop() {
            let already_applied = remaps.len();
            let result = command.reverse(storage, remaps).await;
            let fresh = remaps[already_applied..].to_vec();
            if !fresh.is_empty() {
                self.remap_ids(&fresh);
            }
            result?;
        }
        Ok(())
    }

    /// Rewrite ids across every command on the stack
    pub fn remap_ids(&mut self, pairs: &[(i64, i64)]) {
        for command in &mut self.commands {
            command.remap_ids(pairs);
        }
    }
}
