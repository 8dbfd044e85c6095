//! Month filter menu state.

use crate::domain::{DEFAULT_MONTHS, DomainError, Month, MonthSelection};

/// Check boxes for "all", May, June and July.
///
/// The selection is only handed to the owning view when the menu closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthMenu {
    open: bool,
    all: bool,
    checked: [bool; 3],
}

impl Default for MonthMenu {
    fn default() -> Self {
        Self {
            open: false,
            all: true,
            checked: [true; 3],
        }
    }
}

impl MonthMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn all_checked(&self) -> bool {
        self.all
    }

    pub fn is_checked(&self, month: Month) -> bool {
        Self::slot(month).is_some_and(|i| self.checked[i])
    }

    /// Open or close the menu. Closing returns the selection to apply.
    pub fn toggle_open(&mut self) -> Option<MonthSelection> {
        self.open = !self.open;
        if self.open { None } else { Some(self.selection()) }
    }

    /// The "all" box drives the three month boxes.
    pub fn set_all(&mut self, checked: bool) {
        self.all = checked;
        self.checked = [checked; 3];
    }

    /// Flip one month box. Months outside May to July are rejected.
    pub fn toggle(&mut self, month: Month) -> Result<(), DomainError> {
        let slot = Self::slot(month)
            .ok_or_else(|| DomainError::InvalidMonth(format!("{} is not selectable", month)))?;

        self.checked[slot] = !self.checked[slot];
        if self.checked.iter().any(|c| !c) {
            self.all = false;
        }
        Ok(())
    }

    /// Checked months, always in May, June, July order.
    pub fn selection(&self) -> MonthSelection {
        let numbers: Vec<u8> = DEFAULT_MONTHS
            .iter()
            .zip(self.checked)
            .filter(|(_, checked)| *checked)
            .map(|(n, _)| *n)
            .collect();

        // Every entry comes from DEFAULT_MONTHS, so this cannot fail
        MonthSelection::from_numbers(&numbers).unwrap_or_default()
    }

    fn slot(month: Month) -> Option<usize> {
        DEFAULT_MONTHS.iter().position(|&n| n == month.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(n: u8) -> Month {
        Month::new(n).unwrap()
    }

    #[test]
    fn starts_with_everything_checked() {
        let menu = MonthMenu::new();
        assert!(menu.all_checked());
        assert!(!menu.is_open());
        assert_eq!(menu.selection().numbers(), vec![5, 6, 7]);
    }

    #[test]
    fn closing_emits_selection() {
        let mut menu = MonthMenu::new();
        assert_eq!(menu.toggle_open(), None);
        menu.toggle(month(6)).unwrap();
        let emitted = menu.toggle_open().unwrap();
        assert_eq!(emitted.numbers(), vec![5, 7]);
    }

    #[test]
    fn unchecking_a_month_unchecks_all() {
        let mut menu = MonthMenu::new();
        menu.toggle(month(5)).unwrap();
        assert!(!menu.all_checked());
        assert!(!menu.is_checked(month(5)));

        // Re-checking every month leaves "all" alone
        menu.toggle(month(5)).unwrap();
        assert!(!menu.all_checked());
        assert_eq!(menu.selection().numbers(), vec![5, 6, 7]);
    }

    #[test]
    fn selection_is_in_calendar_order() {
        let mut menu = MonthMenu::new();
        menu.set_all(false);
        menu.toggle(month(7)).unwrap();
        menu.toggle(month(5)).unwrap();
        assert_eq!(menu.selection().numbers(), vec![5, 7]);
    }

    #[test]
    fn all_toggles_every_month() {
        let mut menu = MonthMenu::new();
        menu.set_all(false);
        assert!(menu.selection().is_empty());

        menu.set_all(true);
        assert_eq!(menu.selection().numbers(), vec![5, 6, 7]);
    }

    #[test]
    fn other_months_rejected() {
        let mut menu = MonthMenu::new();
        assert!(menu.toggle(month(12)).is_err());
        assert!(!menu.is_checked(month(1)));
    }
}
