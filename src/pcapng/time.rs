use std::convert::TryFrom;

use chrono::{DateTime, Utc};

use crate::error::PcapError;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Interface timestamp resolution (raw `if_tsresol` value)
///
/// If the most significant bit is 0, the remaining bits give the resolution as a negative
/// power of 10 (6 means microseconds). Otherwise, they give it as a negative power of 2.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TsResolution(pub u8);

impl TsResolution {
    pub const MICROSECONDS: TsResolution = TsResolution(6);
    pub const NANOSECONDS: TsResolution = TsResolution(9);

    /// True if the resolution is a power of 2
    #[inline]
    pub fn is_binary(self) -> bool {
        self.0 & 0x80 != 0
    }

    #[inline]
    pub fn exponent(self) -> u32 {
        u32::from(self.0 & 0x7f)
    }

    /// Compute the timestamp resolution, in units per second
    ///
    /// Return the resolution, or `None` if the resolution is invalid (for ex. greater than `2^64`)
    pub fn units_per_second(self) -> Option<u64> {
        if self.is_binary() {
            1u64.checked_shl(self.exponent())
        } else {
            10u64.checked_pow(self.exponent())
        }
    }

    /// Convert a raw timestamp (in resolution units) to nanoseconds
    ///
    /// Resolutions finer than a nanosecond are truncated.
    pub fn to_nanos(self, ts: u64) -> i128 {
        let ts = i128::from(ts);
        let exp = self.exponent();
        if self.is_binary() {
            // ts < 2^64, so ts * 10^9 < 2^94
            (ts * NANOS_PER_SEC) >> exp
        } else if exp <= 9 {
            ts * 10i128.pow(9 - exp)
        } else {
            match 10i128.checked_pow(exp - 9) {
                Some(div) => ts / div,
                None => 0,
            }
        }
    }
}

impl Default for TsResolution {
    fn default() -> Self {
        TsResolution::MICROSECONDS
    }
}

/// Given the timestamp parameters, return the absolute timestamp
///
/// The raw 64-bit value is scaled by the interface resolution, then the interface offset
/// (in seconds) is added.
pub fn build_timestamp(
    ts_high: u32,
    ts_low: u32,
    resolution: TsResolution,
    ts_offset: i64,
) -> Result<DateTime<Utc>, PcapError> {
    let ts = (u64::from(ts_high) << 32) | u64::from(ts_low);
    let nanos = resolution.to_nanos(ts) + i128::from(ts_offset) * NANOS_PER_SEC;
    timestamp_from_nanos(nanos)
}

pub(crate) fn timestamp_from_nanos(nanos: i128) -> Result<DateTime<Utc>, PcapError> {
    let secs = i64::try_from(nanos.div_euclid(NANOS_PER_SEC))
        .map_err(|_| PcapError::TimestampOutOfRange)?;
    // always in 0..10^9
    let subsec = nanos.rem_euclid(NANOS_PER_SEC) as u32;
    DateTime::<Utc>::from_timestamp(secs, subsec).ok_or(PcapError::TimestampOutOfRange)
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn decode_ts() {
        // from https://datatracker.ietf.org/doc/html/draft-ietf-opsawg-pcapng section 4.6 (ISB)
        // '97 c3 04 00 aa 47 ca 64', in Little Endian, decodes to 2012-06-29 07:28:25.298858 UTC.

        const INPUT_HIGH: [u8; 4] = hex!("97 c3 04 00");
        const INPUT_LOW: [u8; 4] = hex!("aa 47 ca 64");
        let ts_high = u32::from_le_bytes(INPUT_HIGH);
        let ts_low = u32::from_le_bytes(INPUT_LOW);

        let dt = build_timestamp(ts_high, ts_low, TsResolution::MICROSECONDS, 0).unwrap();
        assert_eq!(dt.to_string(), "2012-06-29 07:28:25.298858 UTC");
        assert_eq!(dt.timestamp(), 1340954905);
        assert_eq!(dt.timestamp_subsec_micros(), 298858);
    }

    #[test]
    fn resolution_units() {
        assert_eq!(TsResolution(6).units_per_second(), Some(1_000_000));
        assert_eq!(TsResolution(9).units_per_second(), Some(1_000_000_000));
        assert_eq!(TsResolution(0x8a).units_per_second(), Some(1024));
        assert_eq!(TsResolution(20).units_per_second(), None);
        assert_eq!(TsResolution(0xc0).units_per_second(), None);
    }

    #[test]
    fn scale_to_nanos() {
        assert_eq!(TsResolution(6).to_nanos(1_500_000), 1_500_000_000);
        assert_eq!(TsResolution(9).to_nanos(42), 42);
        assert_eq!(TsResolution(12).to_nanos(5_000), 5);
        // 2^-1 second units
        assert_eq!(TsResolution(0x81).to_nanos(3), 1_500_000_000);
        assert_eq!(TsResolution(127).to_nanos(u64::MAX), 0);
    }

    #[test]
    fn offset_is_added_in_seconds() {
        let dt = build_timestamp(0, 2_000_000, TsResolution::MICROSECONDS, 100).unwrap();
        assert_eq!(dt.timestamp(), 102);
        assert_eq!(dt.timestamp_subsec_nanos(), 0);
        // negative offsets are valid
        let dt = build_timestamp(0, 500_000, TsResolution::MICROSECONDS, -1).unwrap();
        assert_eq!(dt.timestamp(), -1);
        assert_eq!(dt.timestamp_subsec_micros(), 500_000);
    }
}
