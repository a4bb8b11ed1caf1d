/// Width and height of the LED matrix.
pub const GRID_SIZE: usize = 16;

/// Length of one driver wait tick in milliseconds.
pub const TICK_MS: i32 = 15;

/// Longest expressible animation wait. One more millisecond would format
/// as "wffff", which the driver treats as the indefinite hold.
pub const MAX_WAIT_MS: i32 = 983_024;

/// Wait-time sentinel for static screens that hold until an external
/// trigger advances the driver.
pub const STATIC_WAIT: i32 = -1;
