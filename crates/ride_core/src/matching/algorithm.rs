use crate::driver::Driver;
use crate::geo::Coordinate;

/// Strategy for picking the driver offered to the user.
pub trait DriverSelector: Send + Sync {
    /// Pick a driver for a user at `user`, or `None` when nobody qualifies.
    /// Implementations must be deterministic for a fixed roster order.
    fn select<'a>(&self, user: Coordinate, roster: &'a [Driver]) -> Option<&'a Driver>;
}
