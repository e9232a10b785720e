/// Outcome of offering a key to a component.
///
/// Shared by every component so views can chain them without a result enum
/// per component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed, nothing for the parent to do
  Handled,
  /// Consumed, and the parent has an event to apply
  Event(T),
  /// Not consumed, the parent should try its next handler
  NotHandled,
}

impl<T> KeyResult<T> {
  pub fn is_consumed(&self) -> bool {
    !matches!(self, KeyResult::NotHandled)
  }
}
