//! Rate-limiting tuning for the `/solve` endpoint, wired into `main.rs` via
//! `actix_governor::Governor`.

/// Refill interval for the per-client token bucket: one new request allowance per
/// second, which comfortably covers a human poking the endpoint while still bounding a
/// misbehaving client.
pub const PER_SECOND: u64 = 1;

/// Burst capacity before throttling kicks in.
pub const BURST_SIZE: u32 = 5;
