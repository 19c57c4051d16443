use crate::HasLength;

#[must_use]
pub fn validate_length<T: HasLength + ?Sized>(
  value: &T,
  min: Option<usize>,
  max: Option<usize>,
) -> bool {
  let length = value.length();
  if min.is_some_and(|min| length < min) {
    return false;
  }
  if max.is_some_and(|max| length > max) {
    return false;
  }
  true
}
