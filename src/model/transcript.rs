use crate::model::turn::Turn;

/// Default file name offered by the "Download Story" dialog.
pub const EXPORT_FILE_NAME: &str = "adventure_log.txt";

/// Ordered, append-only history of turns for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a committed turn and returns a reference to it.
    pub fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turns in the order they were played.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns newest first, paired with their chronological index.
    pub fn feed(&self) -> impl Iterator<Item = (usize, &Turn)> {
        self.turns.iter().enumerate().rev()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Plain text log of the whole story, oldest turn first.
    pub fn export_text(&self) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            out.push_str("You: ");
            out.push_str(turn.player_action());
            out.push_str("\nAI: ");
            out.push_str(turn.narrative());
            out.push_str("\n\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::turn::MediaOutcome;

    fn turn(action: &str, narrative: &str) -> Turn {
        Turn::new(action, narrative, MediaOutcome::Disabled, MediaOutcome::Disabled)
    }

    #[test]
    fn export_is_chronological() {
        let mut t = Transcript::new();
        t.push(turn("look around", "A cold hall."));
        t.push(turn("go north", "A locked gate."));

        assert_eq!(
            t.export_text(),
            "You: look around\nAI: A cold hall.\n\nYou: go north\nAI: A locked gate.\n\n"
        );
    }

    #[test]
    fn feed_is_newest_first() {
        let mut t = Transcript::new();
        t.push(turn("one", "first"));
        t.push(turn("two", "second"));
        t.push(turn("three", "third"));

        let order: Vec<(usize, &str)> = t.feed().map(|(i, t)| (i, t.player_action())).collect();
        assert_eq!(order, vec![(2, "three"), (1, "two"), (0, "one")]);
    }

    #[test]
    fn clear_empties_everything() {
        let mut t = Transcript::new();
        t.push(turn("a", "b"));
        t.push(turn("c", "d"));
        t.clear();

        assert!(t.is_empty());
        assert_eq!(t.export_text(), "");
    }
}
