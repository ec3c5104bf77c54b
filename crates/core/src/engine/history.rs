//! Append-only record of processed commands.

use crate::command::Command;

/// Commands processed in the current run, one per dispatched line.
///
/// Undefined commands are recorded as placeholders, so positions stay
/// aligned with the dispatched lines even across errors.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Command>,
}

impl History {
    /// Append a processed command.
    pub fn push(&mut self, command: Command) {
        self.entries.push(command);
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` before the first command is recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently recorded command.
    pub fn last(&self) -> Option<&Command> {
        self.entries.last()
    }

    /// Commands in processing order.
    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.entries.iter()
    }

    /// The last `k` commands, or all of them if fewer were recorded.
    pub fn tail(&self, k: usize) -> &[Command] {
        &self.entries[self.entries.len().saturating_sub(k)..]
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
