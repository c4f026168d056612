use typed_builder::TypedBuilder;

use semantirs_core::agent::AgentId;
use semantirs_core::metrics::{Decibel, Kilobytes, Mbps, Meters, Metric, MilliJoules, Milliseconds};

use crate::offload::mode::OffloadMode;

pub const VEHICLE_ID: &str = "vehicle_id";
pub const TARGET_ID: &str = "target_id";
pub const SERVING_ID: &str = "serving_id";
pub const MODE: &str = "mode";
pub const RAW_DATA_KB: &str = "raw_data_kb";
pub const COMPRESSED_KB: &str = "compressed_kb";
pub const COMPRESSION_TIME_MS: &str = "compression_time_ms";
pub const DISTANCE_M: &str = "distance_m";
pub const IRS_GAIN_DB: &str = "irs_gain_db";
pub const SNR_DB: &str = "snr_db";
pub const DATARATE_MBPS: &str = "datarate_mbps";
pub const MAC_DELAY_MS: &str = "mac_delay_ms";
pub const TX_DELAY_MS: &str = "tx_delay_ms";
pub const PROP_DELAY_MS: &str = "prop_delay_ms";
pub const PROCESSING_DELAY_MS: &str = "processing_delay_ms";
pub const HANDOVER_DELAY_MS: &str = "handover_delay_ms";
pub const TOTAL_LATENCY_MS: &str = "total_latency_ms";
pub const ENERGY_MJ: &str = "energy_consumption_mj";
pub const PACKET_SUCCESS: &str = "packet_success";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Id,
    Text,
    Number,
    Flag,
}

/// One named value of the flattened sample record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Id(u64),
    Text(&'static str),
    Number(f64),
    Flag(bool),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Id(_) => FieldKind::Id,
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Flag(_) => FieldKind::Flag,
        }
    }
}

/// Result of one simulated transmission. Every field is always populated; stages switched
/// off by the offload mode contribute zero.
#[derive(Debug, Clone, Copy, PartialEq, TypedBuilder)]
pub struct TransmissionSample {
    pub vehicle_id: AgentId,
    pub target_id: AgentId,
    pub serving_id: AgentId,
    pub mode: OffloadMode,
    pub raw_data: Kilobytes,
    pub compressed: Kilobytes,
    pub compression_time: Milliseconds,
    pub distance: Meters,
    pub irs_gain: Decibel,
    pub snr: Decibel,
    pub data_rate: Mbps,
    pub mac_delay: Milliseconds,
    pub tx_delay: Milliseconds,
    pub prop_delay: Milliseconds,
    pub processing_delay: Milliseconds,
    pub handover_delay: Milliseconds,
    pub total_latency: Milliseconds,
    pub energy: MilliJoules,
    pub success: bool,
}

impl TransmissionSample {
    /// Column names and kinds, in the order produced by [`TransmissionSample::fields`].
    pub const SCHEMA: [(&'static str, FieldKind); 19] = [
        (VEHICLE_ID, FieldKind::Id),
        (TARGET_ID, FieldKind::Id),
        (SERVING_ID, FieldKind::Id),
        (MODE, FieldKind::Text),
        (RAW_DATA_KB, FieldKind::Number),
        (COMPRESSED_KB, FieldKind::Number),
        (COMPRESSION_TIME_MS, FieldKind::Number),
        (DISTANCE_M, FieldKind::Number),
        (IRS_GAIN_DB, FieldKind::Number),
        (SNR_DB, FieldKind::Number),
        (DATARATE_MBPS, FieldKind::Number),
        (MAC_DELAY_MS, FieldKind::Number),
        (TX_DELAY_MS, FieldKind::Number),
        (PROP_DELAY_MS, FieldKind::Number),
        (PROCESSING_DELAY_MS, FieldKind::Number),
        (HANDOVER_DELAY_MS, FieldKind::Number),
        (TOTAL_LATENCY_MS, FieldKind::Number),
        (ENERGY_MJ, FieldKind::Number),
        (PACKET_SUCCESS, FieldKind::Flag),
    ];

    /// The record as a flat list of named values.
    pub fn fields(&self) -> [(&'static str, FieldValue); 19] {
        [
            (VEHICLE_ID, FieldValue::Id(self.vehicle_id.as_u64())),
            (TARGET_ID, FieldValue::Id(self.target_id.as_u64())),
            (SERVING_ID, FieldValue::Id(self.serving_id.as_u64())),
            (MODE, FieldValue::Text(self.mode.as_str())),
            (RAW_DATA_KB, FieldValue::Number(self.raw_data.as_f64())),
            (COMPRESSED_KB, FieldValue::Number(self.compressed.as_f64())),
            (COMPRESSION_TIME_MS, FieldValue::Number(self.compression_time.as_f64())),
            (DISTANCE_M, FieldValue::Number(self.distance.as_f64())),
            (IRS_GAIN_DB, FieldValue::Number(self.irs_gain.as_f64())),
            (SNR_DB, FieldValue::Number(self.snr.as_f64())),
            (DATARATE_MBPS, FieldValue::Number(self.data_rate.as_f64())),
            (MAC_DELAY_MS, FieldValue::Number(self.mac_delay.as_f64())),
            (TX_DELAY_MS, FieldValue::Number(self.tx_delay.as_f64())),
            (PROP_DELAY_MS, FieldValue::Number(self.prop_delay.as_f64())),
            (PROCESSING_DELAY_MS, FieldValue::Number(self.processing_delay.as_f64())),
            (HANDOVER_DELAY_MS, FieldValue::Number(self.handover_delay.as_f64())),
            (TOTAL_LATENCY_MS, FieldValue::Number(self.total_latency.as_f64())),
            (ENERGY_MJ, FieldValue::Number(self.energy.as_f64())),
            (PACKET_SUCCESS, FieldValue::Flag(self.success)),
        ]
    }

    pub fn delay_components(&self) -> [Milliseconds; 6] {
        [
            self.compression_time,
            self.mac_delay,
            self.tx_delay,
            self.prop_delay,
            self.processing_delay,
            self.handover_delay,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransmissionSample {
        TransmissionSample::builder()
            .vehicle_id(AgentId::from(3u64))
            .target_id(AgentId::from(1u64))
            .serving_id(AgentId::from(2u64))
            .mode(OffloadMode::Raw)
            .raw_data(Kilobytes::new(1000.0))
            .compressed(Kilobytes::new(1000.0))
            .compression_time(Milliseconds::ZERO)
            .distance(Meters::new(120.0))
            .irs_gain(Decibel::ZERO)
            .snr(Decibel::new(25.0))
            .data_rate(Mbps::new(160.0))
            .mac_delay(Milliseconds::new(51.3))
            .tx_delay(Milliseconds::new(51.2))
            .prop_delay(Milliseconds::new(0.0004))
            .processing_delay(Milliseconds::new(3.0))
            .handover_delay(Milliseconds::ZERO)
            .total_latency(Milliseconds::new(105.5004))
            .energy(MilliJoules::new(10.2))
            .success(true)
            .build()
    }

    #[test]
    fn test_fields_follow_schema() {
        let fields = sample().fields();
        for ((name, value), (schema_name, kind)) in fields.iter().zip(TransmissionSample::SCHEMA) {
            assert_eq!(*name, schema_name);
            assert_eq!(value.kind(), kind);
        }
        assert_eq!(fields[3].1, FieldValue::Text("raw"));
        assert_eq!(fields[18].1, FieldValue::Flag(true));
    }
}
