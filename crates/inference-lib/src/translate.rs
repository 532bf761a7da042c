//! Feature translation from external keys to canonical model columns
//!
//! Callers submit short snake_case feature keys; the classifier was trained
//! on the canonical CICFlowMeter column names. This module maps between the
//! two and assembles a single input row aligned to the model's schema.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Short external key -> canonical training column name.
///
/// One external key maps to exactly one canonical name. The table is
/// process-wide and read-only after first use.
const FEATURE_PAIRS: &[(&str, &str)] = &[
    ("flow_duration", "Flow Duration"),
    ("tot_fwd_pkts", "Total Fwd Packet"),
    ("tot_bwd_pkts", "Total Bwd packets"),
    ("totlen_fwd_pkts", "Total Length of Fwd Packet"),
    ("totlen_bwd_pkts", "Total Length of Bwd Packet"),
    ("fwd_pkt_len_max", "Fwd Packet Length Max"),
    ("fwd_pkt_len_min", "Fwd Packet Length Min"),
    ("fwd_pkt_len_mean", "Fwd Packet Length Mean"),
    ("fwd_pkt_len_std", "Fwd Packet Length Std"),
    ("bwd_pkt_len_max", "Bwd Packet Length Max"),
    ("bwd_pkt_len_min", "Bwd Packet Length Min"),
    ("bwd_pkt_len_mean", "Bwd Packet Length Mean"),
    ("bwd_pkt_len_std", "Bwd Packet Length Std"),
    ("flow_byts_s", "Flow Bytes/s"),
    ("flow_pkts_s", "Flow Packets/s"),
    ("flow_iat_mean", "Flow IAT Mean"),
    ("flow_iat_std", "Flow IAT Std"),
    ("flow_iat_max", "Flow IAT Max"),
    ("flow_iat_min", "Flow IAT Min"),
    ("fwd_iat_tot", "Fwd IAT Total"),
    ("fwd_iat_mean", "Fwd IAT Mean"),
    ("fwd_iat_std", "Fwd IAT Std"),
    ("fwd_iat_max", "Fwd IAT Max"),
    ("fwd_iat_min", "Fwd IAT Min"),
    ("bwd_iat_tot", "Bwd IAT Total"),
    ("bwd_iat_mean", "Bwd IAT Mean"),
    ("bwd_iat_std", "Bwd IAT Std"),
    ("bwd_iat_max", "Bwd IAT Max"),
    ("bwd_iat_min", "Bwd IAT Min"),
    ("fwd_psh_flags", "Fwd PSH Flags"),
    ("bwd_psh_flags", "Bwd PSH Flags"),
    ("fwd_urg_flags", "Fwd URG Flags"),
    ("bwd_urg_flags", "Bwd URG Flags"),
    ("fwd_header_len", "Fwd Header Length"),
    ("bwd_header_len", "Bwd Header Length"),
    ("fwd_pkts_s", "Fwd Packets/s"),
    ("bwd_pkts_s", "Bwd Packets/s"),
    ("pkt_len_min", "Packet Length Min"),
    ("pkt_len_max", "Packet Length Max"),
    ("pkt_len_mean", "Packet Length Mean"),
    ("pkt_len_std", "Packet Length Std"),
    ("pkt_len_var", "Packet Length Variance"),
    ("fin_flag_cnt", "FIN Flag Count"),
    ("syn_flag_cnt", "SYN Flag Count"),
    ("rst_flag_cnt", "RST Flag Count"),
    ("psh_flag_cnt", "PSH Flag Count"),
    ("ack_flag_cnt", "ACK Flag Count"),
    ("urg_flag_cnt", "URG Flag Count"),
    ("cwr_flag_count", "CWR Flag Count"),
    ("ece_flag_cnt", "ECE Flag Count"),
    ("down_up_ratio", "Down/Up Ratio"),
    ("pkt_size_avg", "Average Packet Size"),
    ("fwd_seg_size_avg", "Fwd Segment Size Avg"),
    ("bwd_seg_size_avg", "Bwd Segment Size Avg"),
    ("fwd_byts_b_avg", "Fwd Bytes/Bulk Avg"),
    ("fwd_pkts_b_avg", "Fwd Packet/Bulk Avg"),
    ("fwd_blk_rate_avg", "Fwd Bulk Rate Avg"),
    ("bwd_byts_b_avg", "Bwd Bytes/Bulk Avg"),
    ("bwd_pkts_b_avg", "Bwd Packet/Bulk Avg"),
    ("bwd_blk_rate_avg", "Bwd Bulk Rate Avg"),
    ("subflow_fwd_pkts", "Subflow Fwd Packets"),
    ("subflow_fwd_byts", "Subflow Fwd Bytes"),
    ("subflow_bwd_pkts", "Subflow Bwd Packets"),
    ("subflow_bwd_byts", "Subflow Bwd Bytes"),
    ("init_fwd_win_byts", "FWD Init Win Bytes"),
    ("init_bwd_win_byts", "Bwd Init Win Bytes"),
    ("fwd_act_data_pkts", "Fwd Act Data Pkts"),
    ("fwd_seg_size_min", "Fwd Seg Size Min"),
    ("active_mean", "Active Mean"),
    ("active_std", "Active Std"),
    ("active_max", "Active Max"),
    ("active_min", "Active Min"),
    ("idle_mean", "Idle Mean"),
    ("idle_std", "Idle Std"),
    ("idle_max", "Idle Max"),
    ("idle_min", "Idle Min"),
];

/// Lookup table built once on first use
pub fn feature_mapping() -> &'static HashMap<&'static str, &'static str> {
    static MAPPING: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAPPING.get_or_init(|| FEATURE_PAIRS.iter().copied().collect())
}

/// A single model-ready input row, aligned to a feature schema.
///
/// Values are ordered exactly as the schema's columns; columns with no
/// corresponding payload value are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    values: Vec<Option<f64>>,
    usable: usize,
}

impl InputRow {
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Number of schema columns that received a payload value
    pub fn usable_columns(&self) -> usize {
        self.usable
    }

    /// Total width of the row (schema column count)
    pub fn width(&self) -> usize {
        self.values.len()
    }
}

/// Translate a caller payload into an input row for the given schema.
///
/// Pure function: unmapped payload keys are silently dropped, mapped keys
/// whose canonical name is absent from the schema are dropped, and schema
/// columns without a value stay absent. An empty payload still yields a
/// structurally valid all-absent row; rejecting it is the pipeline's job.
pub fn translate(payload: &Map<String, Value>, schema: &[String]) -> InputRow {
    let mapping = feature_mapping();

    let mut by_canonical: HashMap<&str, f64> = HashMap::new();
    for (key, value) in payload {
        if let Some(canonical) = mapping.get(key.as_str()).copied() {
            if let Some(v) = scalar_value(value) {
                by_canonical.insert(canonical, v);
            }
        }
    }

    let mut values = Vec::with_capacity(schema.len());
    let mut usable = 0;
    for column in schema {
        let value = by_canonical.get(column.as_str()).copied();
        if value.is_some() {
            usable += 1;
        }
        values.push(value);
    }

    InputRow { values, usable }
}

fn scalar_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}
