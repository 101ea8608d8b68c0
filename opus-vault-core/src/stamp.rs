use opus_vault_spec::ArtefactRecord;
use time::{Duration, OffsetDateTime};

/// Assigns audit timestamps after successful mutations.
///
/// `updated_at` is strictly monotonic per record: if the wall clock has not
/// advanced past the stored value (coarse clocks, clock steps), the stamp
/// moves forward by one nanosecond instead of standing still.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampObserver;

impl TimestampObserver {
    /// Stamp a freshly created record. Both timestamps receive the same
    /// instant.
    pub fn on_create(&self, record: &mut ArtefactRecord) {
        let now = OffsetDateTime::now_utc();
        record.created_at = now;
        record.updated_at = now;
    }

    /// Stamp a mutated record. `created_at` is left untouched.
    pub fn on_update(&self, record: &mut ArtefactRecord) {
        let now = OffsetDateTime::now_utc();
        record.updated_at = if now > record.updated_at {
            now
        } else {
            record.updated_at + Duration::nanoseconds(1)
        };
    }
}
