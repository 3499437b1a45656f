/// Outcome of offering a key to a component.
///
/// Views try their components in order and stop at the first one that
/// consumes the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Key was consumed, nothing for the parent to do
  Handled,
  /// Key was consumed and produced an event for the parent
  Event(T),
  /// Key was not consumed, parent should try the next handler
  NotHandled,
}
