//! Run audit trail and device inventory.
//!
//! After a walk the caller records one audit event describing it and one
//! device per reached hop. Devices are keyed by management address, so
//! recording the same chain twice does not duplicate anything.

use std::fmt;
use std::time::SystemTime;

use indexmap::IndexMap;
use indexmap::map::Entry;
use log::debug;
use serde::Serialize;

use crate::error::Result;
use crate::walker::{DeviceHop, RunResult};

/// Event type of every walk audit record.
pub const ROUTING_CONFIG: &str = "ROUTING_CONFIG";

/// Severity of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventLevel {
    Info,
    Error,
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("INFO"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub at: SystemTime,
    pub level: EventLevel,
    pub event_type: String,
    pub message: String,
}

impl AuditEvent {
    pub fn new(
        level: EventLevel,
        event_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            at: SystemTime::now(),
            level,
            event_type: event_type.into(),
            message: message.into(),
        }
    }
}

/// A device as remembered by the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    /// Position label at discovery time, e.g. `R2`.
    pub hostname: Option<String>,
    pub mgmt_ip: String,
    pub jump_via: Option<String>,
    pub discovered_at: SystemTime,
}

impl From<&DeviceHop> for DeviceRecord {
    fn from(hop: &DeviceHop) -> Self {
        Self {
            hostname: Some(hop.label.clone()),
            mgmt_ip: hop.address.clone(),
            jump_via: hop.jump_via.clone(),
            discovered_at: SystemTime::now(),
        }
    }
}

/// Where walk outcomes are stored.
pub trait Inventory {
    fn record_event(&mut self, event: AuditEvent);

    /// Store `device` unless its management address is already known.
    /// Returns whether it was inserted.
    fn upsert_device(&mut self, device: DeviceRecord) -> bool;
}

/// [`Inventory`] kept in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    events: Vec<AuditEvent>,
    devices: IndexMap<String, DeviceRecord>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    pub fn devices(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.devices.values()
    }

    pub fn device(&self, mgmt_ip: &str) -> Option<&DeviceRecord> {
        self.devices.get(mgmt_ip)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

impl Inventory for MemoryInventory {
    fn record_event(&mut self, event: AuditEvent) {
        self.events.push(event);
    }

    fn upsert_device(&mut self, device: DeviceRecord) -> bool {
        match self.devices.entry(device.mgmt_ip.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(device);
                true
            }
        }
    }
}

/// Record the outcome of a walk.
///
/// A finished walk, halted or not, yields an `INFO` event and every reached
/// device. A failed walk yields a single `ERROR` event with the error text.
pub fn record_run<I: Inventory + ?Sized>(inventory: &mut I, outcome: &Result<RunResult>) {
    match outcome {
        Ok(run) => {
            inventory.record_event(AuditEvent::new(
                EventLevel::Info,
                ROUTING_CONFIG,
                format!("configured {} from seed {}", run.protocol, run.seed),
            ));
            let inserted = run
                .devices
                .iter()
                .filter(|hop| inventory.upsert_device(DeviceRecord::from(*hop)))
                .count();
            debug!(
                "recorded {} new of {} device(s)",
                inserted,
                run.devices.len()
            );
        }
        Err(e) => inventory.record_event(AuditEvent::new(
            EventLevel::Error,
            ROUTING_CONFIG,
            e.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalkError;
    use crate::walker::hop_label;

    fn run(addresses: &[&str]) -> RunResult {
        let mut run = RunResult::new("RIP", addresses[0]);
        for (i, address) in addresses.iter().enumerate() {
            run.devices.push(DeviceHop {
                label: hop_label(i + 1),
                address: address.to_string(),
                jump_via: i.checked_sub(1).map(|prev| addresses[prev].to_string()),
            });
        }
        run
    }

    #[test]
    fn test_record_successful_run() {
        let mut inventory = MemoryInventory::new();
        record_run(&mut inventory, &Ok(run(&["148.204.58.1", "148.204.58.2"])));

        assert_eq!(inventory.events().len(), 1);
        let event = &inventory.events()[0];
        assert_eq!(event.level, EventLevel::Info);
        assert_eq!(event.event_type, ROUTING_CONFIG);
        assert_eq!(event.message, "configured RIP from seed 148.204.58.1");

        assert_eq!(inventory.device_count(), 2);
        let r2 = inventory.device("148.204.58.2").unwrap();
        assert_eq!(r2.hostname.as_deref(), Some("R2"));
        assert_eq!(r2.jump_via.as_deref(), Some("148.204.58.1"));
    }

    #[test]
    fn test_rerun_does_not_duplicate_devices() {
        let mut inventory = MemoryInventory::new();
        record_run(&mut inventory, &Ok(run(&["148.204.58.1", "148.204.58.2"])));
        record_run(
            &mut inventory,
            &Ok(run(&["148.204.58.2", "10.0.23.2"])),
        );

        assert_eq!(inventory.events().len(), 2);
        let addresses: Vec<_> = inventory.devices().map(|d| d.mgmt_ip.as_str()).collect();
        assert_eq!(addresses, vec!["148.204.58.1", "148.204.58.2", "10.0.23.2"]);

        // First-seen record wins.
        let r2 = inventory.device("148.204.58.2").unwrap();
        assert_eq!(r2.hostname.as_deref(), Some("R2"));
        assert_eq!(r2.jump_via.as_deref(), Some("148.204.58.1"));
    }

    #[test]
    fn test_record_failed_run() {
        let mut inventory = MemoryInventory::new();
        let outcome: Result<RunResult> = Err(WalkError::UnknownProtocol {
            name: "EIGRP".to_string(),
        }
        .into());
        record_run(&mut inventory, &outcome);

        assert_eq!(inventory.device_count(), 0);
        assert_eq!(inventory.events().len(), 1);
        let event = &inventory.events()[0];
        assert_eq!(event.level, EventLevel::Error);
        assert!(event.message.contains("EIGRP"));
    }

    #[test]
    fn test_upsert_reports_insertion() {
        let mut inventory = MemoryInventory::new();
        let hop = DeviceHop {
            label: hop_label(1),
            address: "10.0.0.1".to_string(),
            jump_via: None,
        };
        assert!(inventory.upsert_device(DeviceRecord::from(&hop)));
        assert!(!inventory.upsert_device(DeviceRecord::from(&hop)));
    }
}
