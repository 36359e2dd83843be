//! Display fields and the single function that writes a snapshot into them.

use crate::types::Snapshot;

pub const PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    CurrentTime,
    IpAddress,
    CpuUsage,
    SocTemp,
    TotalRam,
    UsedRam,
    TotalSwap,
    UsedSwap,
}

impl FieldId {
    /// Display order.
    pub const ALL: [FieldId; 8] = [
        FieldId::CurrentTime,
        FieldId::IpAddress,
        FieldId::CpuUsage,
        FieldId::SocTemp,
        FieldId::TotalRam,
        FieldId::UsedRam,
        FieldId::TotalSwap,
        FieldId::UsedSwap,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            FieldId::CurrentTime => "current-time",
            FieldId::IpAddress => "ip-address",
            FieldId::CpuUsage => "cpu-usage",
            FieldId::SocTemp => "soc-temp",
            FieldId::TotalRam => "total-ram",
            FieldId::UsedRam => "used-ram",
            FieldId::TotalSwap => "total-swap",
            FieldId::UsedSwap => "used-swap",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::CurrentTime => "Current Time",
            FieldId::IpAddress => "IP Address",
            FieldId::CpuUsage => "CPU Usage",
            FieldId::SocTemp => "SoC Temperature",
            FieldId::TotalRam => "Total RAM",
            FieldId::UsedRam => "Used RAM",
            FieldId::TotalSwap => "Total Swap",
            FieldId::UsedSwap => "Used Swap",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn read(self, s: &Snapshot) -> &str {
        match self {
            FieldId::CurrentTime => &s.current_time,
            FieldId::IpAddress => &s.ip_address,
            FieldId::CpuUsage => &s.cpu_usage,
            FieldId::SocTemp => &s.soc_temp,
            FieldId::TotalRam => &s.total_ram,
            FieldId::UsedRam => &s.used_ram,
            FieldId::TotalSwap => &s.total_swap,
            FieldId::UsedSwap => &s.used_swap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    values: [String; 8],
}

impl DashboardView {
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|_| PLACEHOLDER.to_string()),
        }
    }

    /// Copy every field of the snapshot into the view, verbatim.
    pub fn apply(&mut self, snapshot: &Snapshot) {
        for id in FieldId::ALL {
            self.values[id.index()] = id.read(snapshot).to_string();
        }
    }

    pub fn get(&self, id: FieldId) -> &str {
        &self.values[id.index()]
    }

    /// Look a field up by its element id (`"cpu-usage"`, ...).
    pub fn by_element_id(&self, element_id: &str) -> Option<&str> {
        FieldId::ALL
            .into_iter()
            .find(|id| id.element_id() == element_id)
            .map(|id| self.get(id))
    }

    pub fn rows(&self) -> impl Iterator<Item = (FieldId, &str)> {
        FieldId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Snapshot {
        Snapshot {
            current_time: "12:00".into(),
            ip_address: "10.0.0.1".into(),
            cpu_usage: "5%".into(),
            soc_temp: "40C".into(),
            total_ram: "8GB".into(),
            used_ram: "2GB".into(),
            total_swap: "1GB".into(),
            used_swap: "0GB".into(),
        }
    }

    #[test]
    fn starts_with_placeholders() {
        let v = DashboardView::new();
        assert!(v.rows().all(|(_, val)| val == PLACEHOLDER));
    }

    #[test]
    fn apply_writes_every_element() {
        let mut v = DashboardView::new();
        v.apply(&example());
        let expected = [
            ("current-time", "12:00"),
            ("ip-address", "10.0.0.1"),
            ("cpu-usage", "5%"),
            ("soc-temp", "40C"),
            ("total-ram", "8GB"),
            ("used-ram", "2GB"),
            ("total-swap", "1GB"),
            ("used-swap", "0GB"),
        ];
        for (id, val) in expected {
            assert_eq!(v.by_element_id(id), Some(val), "field {id}");
        }
    }

    #[test]
    fn labels_match_json_keys() {
        // labels double as the API's key names
        let obj: serde_json::Map<String, serde_json::Value> = FieldId::ALL
            .into_iter()
            .map(|f| (f.label().to_string(), f.element_id().into()))
            .collect();
        let body = serde_json::to_vec(&obj).unwrap();
        let mut v = DashboardView::new();
        v.apply(&Snapshot::from_slice(&body).unwrap());
        for (id, val) in v.rows() {
            assert_eq!(val, id.element_id());
        }
    }

    #[test]
    fn unknown_element_id() {
        assert_eq!(DashboardView::new().by_element_id("shutdown-btn"), None);
    }
}
