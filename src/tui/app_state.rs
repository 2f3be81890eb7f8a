#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

/// All mutable state behind the chat window.
pub struct TuiState {
    pub turns: Vec<Turn>,
    pub input: String,
    pub scroll: u16,
    /// Stick to the bottom of the transcript as new turns arrive.
    pub follow: bool,
    pub busy: bool,
    pub quit: bool,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            input: String::new(),
            scroll: 0,
            follow: true,
            busy: false,
            quit: false,
        }
    }

    pub fn push_turn(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.turns.push(Turn {
            speaker,
            text: text.into(),
        });
        self.follow = true;
    }

    /// Take the pending input, if it has any content.
    pub fn take_input(&mut self) -> Option<String> {
        let text = self.input.trim().to_string();
        self.input.clear();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_input_clears_and_trims() {
        let mut state = TuiState::new();
        state.input = "  hello  ".to_string();
        assert_eq!(state.take_input(), Some("hello".to_string()));
        assert!(state.input.is_empty());
        assert_eq!(state.take_input(), None);
    }

    #[test]
    fn new_turn_resumes_following() {
        let mut state = TuiState::new();
        state.scroll_up(3);
        assert!(!state.follow);
        state.push_turn(Speaker::Bot, "hi");
        assert!(state.follow);
    }
}
