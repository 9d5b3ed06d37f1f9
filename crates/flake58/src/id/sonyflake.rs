use core::fmt;

/// A 64-bit Sonyflake-style ID.
///
/// - 1 bit reserved (always zero when minted)
/// - 39 bits timestamp (10ms ticks since the generator's start epoch)
/// - 8 bits sequence
/// - 16 bits machine ID
///
/// ```text
///  Bit Index:  63           63 62            24 23            16 15             0
///              +--------------+----------------+----------------+---------------+
///  Field:      | reserved (1) | timestamp (39) | sequence (8)   | machine ID(16)|
///              +--------------+----------------+----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ----------->|
/// ```
///
/// Ordering on the raw value is the generation order of a single generator:
/// the timestamp dominates, then the sequence. IDs from generators with
/// different machine IDs are only coarsely ordered by their timestamps.
///
/// # Example
///
/// ```
/// use flake58::SonyflakeId;
///
/// let id = SonyflakeId::from_components(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.machine_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SonyflakeId {
    id: u64,
}

impl SonyflakeId {
    /// Bitmask for extracting the 39-bit timestamp field. Occupies bits 24
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 39) - 1;

    /// Bitmask for extracting the 8-bit sequence field. Occupies bits 16
    /// through 23.
    pub const SEQUENCE_MASK: u64 = (1 << 8) - 1;

    /// Bitmask for extracting the 16-bit machine ID field. Occupies bits 0
    /// through 15.
    pub const MACHINE_ID_MASK: u64 = (1 << 16) - 1;

    /// Number of bits to shift the timestamp to its position (sequence and
    /// machine ID widths combined).
    pub const TIMESTAMP_SHIFT: u64 = 8 + 16;

    /// Number of bits to shift the sequence to its position.
    pub const SEQUENCE_SHIFT: u64 = 16;

    /// The machine ID occupies the low bits.
    pub const MACHINE_ID_SHIFT: u64 = 0;

    /// Packs the three fields. Each component is masked to its width, so
    /// out-of-range inputs are truncated rather than bleeding into
    /// neighbouring fields.
    pub const fn from_components(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        let machine_id = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        Self {
            id: timestamp | sequence | machine_id,
        }
    }

    /// Wraps a raw value as-is. The reserved bit is not validated.
    pub const fn from_raw(id: u64) -> Self {
        Self { id }
    }

    /// Returns the packed 64-bit value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the elapsed-tick timestamp.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the per-tick sequence.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Extracts the machine discriminator.
    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    /// Returns the reserved top bit. Zero for every minted ID.
    pub const fn msb(&self) -> u64 {
        self.id >> 63
    }

    /// Largest tick the 39-bit timestamp field can hold.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Largest per-tick sequence number (255).
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Largest machine ID (65535).
    pub const fn max_machine_id() -> u64 {
        Self::MACHINE_ID_MASK
    }

    /// Returns true if the sequence can be incremented within this tick.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns a new ID with the sequence incremented, same tick.
    pub const fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.machine_id(), self.sequence() + 1)
    }

    /// Returns a new ID for the given tick with the sequence reset to zero.
    pub const fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.machine_id(), 0)
    }
}

impl From<SonyflakeId> for u64 {
    fn from(id: SonyflakeId) -> Self {
        id.to_raw()
    }
}

impl From<u64> for SonyflakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for SonyflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SonyflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SonyflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("sequence", &self.sequence())
            .field("machine_id", &self.machine_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_max() {
        let id = SonyflakeId::from_components(
            SonyflakeId::max_timestamp(),
            SonyflakeId::max_machine_id(),
            SonyflakeId::max_sequence(),
        );
        assert_eq!(id.timestamp(), (1 << 39) - 1);
        assert_eq!(id.sequence(), 255);
        assert_eq!(id.machine_id(), 65535);
        assert_eq!(id.msb(), 0);
        assert_eq!(id.to_raw(), i64::MAX as u64);
    }

    #[test]
    fn layout_zero() {
        let id = SonyflakeId::from_components(0, 0, 0);
        assert_eq!(id.to_raw(), 0);
        assert_eq!(id, SonyflakeId::default());
    }

    #[test]
    fn fields_do_not_overlap() {
        let id = SonyflakeId::from_components(5, 7, 3);
        assert_eq!(id.to_raw(), (5 << 24) | (3 << 16) | 7);
        assert_eq!(id.timestamp(), 5);
        assert_eq!(id.sequence(), 3);
        assert_eq!(id.machine_id(), 7);
    }

    #[test]
    fn components_are_masked() {
        let id = SonyflakeId::from_components(1 << 39, 1 << 16, 1 << 8);
        assert_eq!(id.to_raw(), 0);
    }

    #[test]
    fn reserved_bit_is_structural_only() {
        let id = SonyflakeId::from_raw(u64::MAX);
        assert_eq!(id.msb(), 1);
        assert_eq!(id.timestamp(), SonyflakeId::max_timestamp());
        assert_eq!(id.sequence(), SonyflakeId::max_sequence());
        assert_eq!(id.machine_id(), SonyflakeId::max_machine_id());
    }

    #[test]
    fn sequence_then_rollover() {
        let id = SonyflakeId::from_components(10, 1, 254);
        assert!(id.has_sequence_room());
        let id = id.increment_sequence();
        assert_eq!(id.sequence(), 255);
        assert!(!id.has_sequence_room());
        let next = id.rollover_to_timestamp(11);
        assert_eq!(next.timestamp(), 11);
        assert_eq!(next.sequence(), 0);
        assert_eq!(next.machine_id(), 1);
        assert!(id < next);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_is_transparent() {
        let id = SonyflakeId::from_components(3, 4, 5);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.to_raw().to_string());
        let back: SonyflakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
