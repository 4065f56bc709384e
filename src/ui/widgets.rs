use ratatui::widgets::ListState;

/// A list of items with a wrapping selection.
#[derive(Debug, Default)]
pub struct StatefulList<T> {
    pub state: ListState,
    pub items: Vec<T>,
}

impl<T> StatefulList<T> {
    pub fn with_items(items: Vec<T>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }
        Self { state, items }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    // Digits are 1-based on screen.
    pub fn select_digit(&mut self, digit: u32) -> Option<&T> {
        let index = (digit as usize).checked_sub(1)?;
        if index < self.items.len() {
            self.state.select(Some(index));
            self.items.get(index)
        } else {
            None
        }
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps() {
        let mut list = StatefulList::with_items(vec!["a", "b", "c"]);
        list.previous();
        assert_eq!(list.selected(), Some(&"c"));
        list.next();
        assert_eq!(list.selected(), Some(&"a"));
        assert_eq!(list.select_digit(2), Some(&"b"));
        assert_eq!(list.select_digit(0), None);
        assert_eq!(list.select_digit(9), None);
    }
}
