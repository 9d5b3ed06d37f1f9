use crate::{SonyflakeId, TICK_MILLIS};
use std::collections::BTreeMap;

/// The fields of a decoded [`SonyflakeId`], for diagnostics.
///
/// `time` is the raw elapsed-tick count; `unix_millis` is that tick resolved
/// against the generator's start epoch (`start + time * 10ms`), saturating at
/// `u64::MAX`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decomposition {
    pub id: u64,
    pub msb: u64,
    pub time: u64,
    pub sequence: u64,
    pub machine_id: u64,
    pub unix_millis: u64,
}

impl Decomposition {
    /// Splits `id` into its fields. `start_millis` is the start epoch in
    /// milliseconds since the Unix epoch.
    pub const fn new(id: SonyflakeId, start_millis: u64) -> Self {
        Self {
            id: id.to_raw(),
            msb: id.msb(),
            time: id.timestamp(),
            sequence: id.sequence(),
            machine_id: id.machine_id(),
            unix_millis: start_millis.saturating_add(id.timestamp() * TICK_MILLIS),
        }
    }

    /// The keyed form: `id`, `msb`, `time`, `sequence` and `machine-id`.
    pub fn to_map(&self) -> BTreeMap<&'static str, u64> {
        BTreeMap::from([
            ("id", self.id),
            ("msb", self.msb),
            ("time", self.time),
            ("sequence", self.sequence),
            ("machine-id", self.machine_id),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_unix_time_from_ticks() {
        let id = SonyflakeId::from_components(250, 9, 4);
        let parts = Decomposition::new(id, 1_000);
        assert_eq!(parts.time, 250);
        assert_eq!(parts.sequence, 4);
        assert_eq!(parts.machine_id, 9);
        assert_eq!(parts.msb, 0);
        assert_eq!(parts.unix_millis, 1_000 + 2_500);
    }

    #[test]
    fn unix_time_saturates() {
        let id = SonyflakeId::from_components(SonyflakeId::max_timestamp(), 0, 0);
        let parts = Decomposition::new(id, u64::MAX - 1);
        assert_eq!(parts.unix_millis, u64::MAX);
        assert_eq!(parts.time, SonyflakeId::max_timestamp());
    }

    #[test]
    fn map_keys() {
        let id = SonyflakeId::from_components(1, 65535, 2);
        let map = Decomposition::new(id, 0).to_map();
        assert_eq!(map["id"], id.to_raw());
        assert_eq!(map["time"], 1);
        assert_eq!(map["sequence"], 2);
        assert_eq!(map["machine-id"], 65535);
        assert_eq!(map["msb"], 0);
        assert_eq!(map.len(), 5);
    }
}
