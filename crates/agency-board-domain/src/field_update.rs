/// Three-state update for an optional card field.
///
/// `Keep` leaves the stored value alone, `Set` replaces it and `Clear`
/// removes it. Used by [`CardUpdate`](crate::CardUpdate) for description,
/// due date and justification, where "not mentioned" and "remove" differ.
///
/// ```
/// use agency_board_domain::FieldUpdate;
///
/// let mut justification = None;
/// FieldUpdate::Set("supplier delay".to_string()).apply_to(&mut justification);
/// assert_eq!(justification.as_deref(), Some("supplier delay"));
///
/// FieldUpdate::<String>::Keep.apply_to(&mut justification);
/// assert!(justification.is_some());
///
/// FieldUpdate::<String>::Clear.apply_to(&mut justification);
/// assert_eq!(justification, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Set(T),
    Clear,
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(value) => *field = Some(value),
            Self::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Keep)
    }
}
