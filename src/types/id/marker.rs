mod private {
  pub trait Sealed {}
}

macro_rules! markers {
  { $( $(#[$meta:meta])* $ident:ident, )* } => {$(
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $ident;
    impl private::Sealed for $ident {}
    impl Marker for $ident {}
  )*};
}

markers! {
  /// Internal key of a user row.
  UserMarker,
  /// Internal key of a customer row, never exposed over HTTP.
  CustomerMarker,
  /// Internal key of a payment row, never exposed over HTTP.
  PaymentMarker,
}

/// Restricts which types can be used as the generic argument of
/// [`Id`](super::Id).
pub trait Marker: private::Sealed + Send + Sync + 'static {}
