//! Seed-and-jump walk.
//!
//! Starting from one reachable seed, the walker configures a routing
//! protocol on each device, discovers the next device across a /30 link and
//! reaches it through a tunnel into the device it is on. It never goes past
//! `max_devices`, and stops early when discovery finds nothing or a hop
//! fails.
//!
//! Only an unusable input or an unreachable seed fails a walk. Everything
//! after the seed is reported in [`RunResult::results`].
//!
//! Tunnels nest. The tunnel into hop *k* is opened through the tunnel into
//! hop *k*-1, so tunnels are kept on a stack and closed in reverse order
//! once the walk is over. An administrative session is released as soon as
//! the next device has been reached and configured.

mod builder;
mod connector;
mod result;

use log::{debug, info, warn};

pub use builder::{DEFAULT_MAX_DEVICES, WalkerBuilder, run_orchestration};
pub use connector::{Connector, SshConnector};
pub use result::{
    DeviceHop, HopOutcome, HopResult, NO_NEXT_HOP, RunResult, WalkState, hop_label,
};

use crate::driver::AdminSession;
use crate::error::{Result, WalkError};
use crate::parse;
use crate::routing::Protocol;

/// Lists interfaces with their addresses and state.
pub const SHOW_IP_INTERFACE_BRIEF: &str = "show ip interface brief";
/// Dumps the running configuration, where masks are found.
pub const SHOW_RUNNING_CONFIG: &str = "show running-config";

/// Validated walk inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkRequest {
    seed: String,
    protocol: Protocol,
    max_devices: usize,
}

impl WalkRequest {
    pub fn new(seed: impl Into<String>, protocol: Protocol, max_devices: usize) -> Result<Self> {
        let seed = seed.into();
        if seed.trim().is_empty() {
            return Err(WalkError::InvalidInput {
                message: "seed address is required".to_string(),
            }
            .into());
        }
        if max_devices == 0 {
            return Err(WalkError::InvalidInput {
                message: "max_devices must be at least 1".to_string(),
            }
            .into());
        }
        Ok(Self {
            seed,
            protocol,
            max_devices,
        })
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn max_devices(&self) -> usize {
        self.max_devices
    }
}

/// Runs one walk through a [`Connector`].
pub struct Walker<C> {
    request: WalkRequest,
    connector: C,
}

impl<C: Connector> Walker<C> {
    pub fn with_connector(request: WalkRequest, connector: C) -> Self {
        Self { request, connector }
    }

    pub fn request(&self) -> &WalkRequest {
        &self.request
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Walk the chain.
    ///
    /// Fails with [`WalkError::SeedUnreachable`] when the seed cannot be
    /// logged into; every later failure ends the walk and is recorded in
    /// the result instead.
    pub async fn run(&self) -> Result<RunResult> {
        let seed = self.request.seed.as_str();
        let mut run = RunResult::new(self.request.protocol.name(), seed);

        enter(&mut run, WalkState::Seeding);
        let mut current = self.connector.connect_direct(seed).await.map_err(|e| {
            warn!("seed {} unreachable: {}", seed, e);
            WalkError::SeedUnreachable {
                address: seed.to_string(),
                source: Box::new(e),
            }
        })?;
        run.devices.push(DeviceHop {
            label: hop_label(1),
            address: seed.to_string(),
            jump_via: None,
        });

        let mut tunnels = Vec::new();
        let finished = self.walk(&mut current, &mut tunnels, &mut run).await;
        enter(&mut run, if finished { WalkState::Done } else { WalkState::Halted });

        current.disconnect().await;
        while let Some(mut tunnel) = tunnels.pop() {
            self.connector.close_tunnel(&mut tunnel).await;
        }

        info!(
            "{} walk from {} finished: {} of {} device(s) configured",
            run.protocol,
            seed,
            run.configured_count(),
            run.results.len()
        );
        Ok(run)
    }

    /// Returns `false` when the walk stopped before `max_devices`.
    ///
    /// A hop whose configuration fails is still marked reached, the seed
    /// included. The walk stops there rather than discovering onward from a
    /// device in an unknown state.
    async fn walk(
        &self,
        current: &mut C::Session,
        tunnels: &mut Vec<C::Tunnel>,
        run: &mut RunResult,
    ) -> bool {
        let protocol = self.request.protocol;
        let mut current_address = self.request.seed.clone();

        enter(run, WalkState::Configuring(1));
        match protocol.enable(current).await {
            Ok(output) => run
                .results
                .push(HopResult::configured(1, &current_address, None, output)),
            Err(e) => {
                warn!("configuring seed {} failed: {}", current_address, e);
                run.results
                    .push(HopResult::rejected(1, &current_address, None, e));
                return false;
            }
        }

        for position in 2..=self.request.max_devices {
            enter(run, WalkState::Discovering(position - 1));
            let next = match discover(current).await {
                Ok(Some(address)) => address.to_string(),
                Ok(None) => {
                    info!("no next hop found on {}", current_address);
                    run.results.push(HopResult::halted(position));
                    return false;
                }
                Err(e) => {
                    warn!("discovery on {} failed: {}", current_address, e);
                    run.results.push(HopResult::failed(
                        position,
                        None,
                        Some(&current_address),
                        format!("next hop discovery failed: {e}"),
                    ));
                    return false;
                }
            };
            debug!("next hop after {} is {}", current_address, next);

            enter(
                run,
                WalkState::Tunneling {
                    from: position - 1,
                    to: position,
                },
            );
            let tunnel = match self
                .connector
                .open_tunnel(&current_address, tunnels.last())
                .await
            {
                Ok(tunnel) => tunnel,
                Err(e) => {
                    warn!("tunnel into {} failed: {}", current_address, e);
                    run.results.push(HopResult::failed(
                        position,
                        Some(&next),
                        Some(&current_address),
                        e,
                    ));
                    return false;
                }
            };
            let reached = self.connector.connect_through(&tunnel, &next).await;
            tunnels.push(tunnel);
            let mut session = match reached {
                Ok(session) => session,
                Err(e) => {
                    warn!("{} unreachable via {}: {}", next, current_address, e);
                    run.results.push(HopResult::failed(
                        position,
                        Some(&next),
                        Some(&current_address),
                        e,
                    ));
                    return false;
                }
            };
            run.devices.push(DeviceHop {
                label: hop_label(position),
                address: next.clone(),
                jump_via: Some(current_address.clone()),
            });

            enter(run, WalkState::Configuring(position));
            match protocol.enable(&mut session).await {
                Ok(output) => run.results.push(HopResult::configured(
                    position,
                    &next,
                    Some(&current_address),
                    output,
                )),
                Err(e) => {
                    warn!("configuring {} failed: {}", next, e);
                    run.results.push(HopResult::rejected(
                        position,
                        &next,
                        Some(&current_address),
                        e,
                    ));
                    session.disconnect().await;
                    return false;
                }
            }

            let mut previous = std::mem::replace(current, session);
            previous.disconnect().await;
            current_address = next;
        }

        true
    }
}

fn enter(run: &mut RunResult, state: WalkState) {
    debug!("walk state: {}", state);
    run.states.push(state);
}

/// Next hop candidate seen from the device behind `session`.
async fn discover<S: AdminSession>(session: &mut S) -> Result<Option<std::net::Ipv4Addr>> {
    let brief = session.send_command(SHOW_IP_INTERFACE_BRIEF).await?;
    let config = session.send_command(SHOW_RUNNING_CONFIG).await?;
    Ok(parse::discover_next_hop(&brief, &config))
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::Error;
    use crate::error::{ChannelError, SessionError, TransportError};

    #[derive(Debug, Clone, Default)]
    struct Device {
        brief: String,
        config: String,
        fail_config: bool,
        fail_discovery: bool,
    }

    /// Build a device from `(interface, address, mask)` rows.
    fn device(interfaces: &[(&str, &str, &str)]) -> Device {
        let mut brief = String::from(
            "Interface              IP-Address      OK? Method Status                Protocol\n",
        );
        let mut config = String::from("Building configuration...\n!\n");
        for (name, address, mask) in interfaces {
            brief.push_str(&format!(
                "{name:<22} {address:<15} YES manual up                    up\n"
            ));
            config.push_str(&format!("interface {name}\n ip address {address} {mask}\n!\n"));
        }
        config.push_str("end\n");
        Device {
            brief,
            config,
            ..Default::default()
        }
    }

    const P30: &str = "255.255.255.252";

    /// R1 (seed) -> R2 -> R3 -> R4, each forward link listed first. R4 has
    /// only a loopback.
    fn chain() -> Network {
        let mut network = Network::default();
        network.add("148.204.58.1", device(&[("FastEthernet0/0", "148.204.58.1", P30)]));
        network.add(
            "148.204.58.2",
            device(&[
                ("FastEthernet0/1", "10.0.23.1", P30),
                ("FastEthernet0/0", "148.204.58.2", P30),
            ]),
        );
        network.add(
            "10.0.23.2",
            device(&[
                ("FastEthernet0/1", "10.0.34.1", P30),
                ("FastEthernet0/0", "10.0.23.2", P30),
            ]),
        );
        network.add("10.0.34.2", device(&[("Loopback0", "4.4.4.4", "255.255.255.255")]));
        network
    }

    #[derive(Default)]
    struct Network {
        devices: HashMap<String, Device>,
        unreachable: HashSet<String>,
        broken_jump_hosts: HashSet<String>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Network {
        fn add(&mut self, address: &str, device: Device) {
            self.devices.insert(address.to_string(), device);
        }

        fn note(&self, event: String) {
            self.log.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }

        fn count(&self, prefix: &str) -> usize {
            self.events().iter().filter(|e| e.starts_with(prefix)).count()
        }

        fn session(&self, address: &str) -> Result<MockSession> {
            match self.devices.get(address) {
                Some(device) if !self.unreachable.contains(address) => Ok(MockSession {
                    address: address.to_string(),
                    device: device.clone(),
                    log: Arc::clone(&self.log),
                    open: true,
                }),
                _ => Err(TransportError::Timeout(Duration::from_secs(10)).into()),
            }
        }
    }

    struct MockSession {
        address: String,
        device: Device,
        log: Arc<Mutex<Vec<String>>>,
        open: bool,
    }

    impl AdminSession for MockSession {
        async fn send_command(&mut self, command: &str) -> Result<String> {
            if !self.open {
                return Err(SessionError::NotConnected.into());
            }
            if self.device.fail_discovery {
                return Err(ChannelError::PatternTimeout(Duration::from_secs(10)).into());
            }
            Ok(match command {
                SHOW_IP_INTERFACE_BRIEF => self.device.brief.clone(),
                SHOW_RUNNING_CONFIG => self.device.config.clone(),
                _ => String::new(),
            })
        }

        async fn send_config_set(&mut self, commands: &[String]) -> Result<String> {
            if !self.open {
                return Err(SessionError::NotConnected.into());
            }
            self.log
                .lock()
                .unwrap()
                .push(format!("configure {}", self.address));
            if self.device.fail_config {
                return Err(ChannelError::Closed.into());
            }
            Ok(commands.iter().map(|c| format!("{c}\n")).collect())
        }

        async fn disconnect(&mut self) {
            if self.open {
                self.open = false;
                self.log
                    .lock()
                    .unwrap()
                    .push(format!("disconnect {}", self.address));
            }
        }
    }

    #[derive(Debug)]
    struct MockTunnel {
        jump_host: String,
        closed: bool,
    }

    impl Connector for Network {
        type Session = MockSession;
        type Tunnel = MockTunnel;

        async fn connect_direct(&self, address: &str) -> Result<MockSession> {
            self.note(format!("connect {address}"));
            self.session(address)
        }

        async fn open_tunnel(
            &self,
            jump_host: &str,
            via: Option<&MockTunnel>,
        ) -> Result<MockTunnel> {
            match via {
                Some(upstream) => {
                    assert!(!upstream.closed, "tunnel opened through a closed tunnel");
                    self.note(format!("tunnel {jump_host} via {}", upstream.jump_host));
                }
                None => self.note(format!("tunnel {jump_host}")),
            }
            if self.broken_jump_hosts.contains(jump_host) {
                return Err(TransportError::AuthenticationFailed {
                    user: "cisco".to_string(),
                }
                .into());
            }
            Ok(MockTunnel {
                jump_host: jump_host.to_string(),
                closed: false,
            })
        }

        async fn connect_through(
            &self,
            tunnel: &MockTunnel,
            destination: &str,
        ) -> Result<MockSession> {
            assert!(!tunnel.closed, "session opened through a closed tunnel");
            self.note(format!("connect {destination} via {}", tunnel.jump_host));
            self.session(destination)
        }

        async fn close_tunnel(&self, tunnel: &mut MockTunnel) {
            tunnel.closed = true;
            self.note(format!("close tunnel {}", tunnel.jump_host));
        }
    }

    fn walker(network: Network, protocol: Protocol, max_devices: usize) -> Walker<Network> {
        let request = WalkRequest::new("148.204.58.1", protocol, max_devices).unwrap();
        Walker::with_connector(request, network)
    }

    fn assert_linear(run: &RunResult) {
        assert_eq!(run.devices[0].jump_via, None);
        for pair in run.devices.windows(2) {
            assert_eq!(pair[1].jump_via.as_deref(), Some(pair[0].address.as_str()));
        }
        for (i, hop) in run.devices.iter().enumerate() {
            assert_eq!(hop.label, hop_label(i + 1));
        }
    }

    /// Every session that opened was disconnected once, and every tunnel
    /// that opened was closed once, innermost first.
    fn assert_released(network: &Network) {
        fn target(prefix: &str, event: &str) -> Option<String> {
            let tail = event.strip_prefix(prefix)?;
            Some(tail.split(" via ").next().unwrap_or(tail).to_string())
        }

        let events = network.events();

        let mut connected: Vec<_> =
            events.iter().filter_map(|e| target("connect ", e)).collect();
        let mut disconnected: Vec<_> =
            events.iter().filter_map(|e| target("disconnect ", e)).collect();
        connected.sort();
        disconnected.sort();
        assert_eq!(connected, disconnected);

        let opened: Vec<_> = events.iter().filter_map(|e| target("tunnel ", e)).collect();
        let mut closed: Vec<_> =
            events.iter().filter_map(|e| target("close tunnel ", e)).collect();
        closed.reverse();
        assert_eq!(opened, closed);
    }

    #[tokio::test]
    async fn test_single_device_never_tunnels() {
        let walker = walker(chain(), Protocol::ospf(), 1);
        let run = walker.run().await.unwrap();

        assert_eq!(run.protocol, "OSPF");
        assert_eq!(run.devices.len(), 1);
        assert_eq!(run.results.len(), 1);
        assert!(run.results[0].is_success());
        assert_eq!(walker.connector().count("tunnel"), 0);
        assert_eq!(
            run.states,
            vec![WalkState::Seeding, WalkState::Configuring(1), WalkState::Done]
        );
        assert_eq!(
            walker.connector().events(),
            vec![
                "connect 148.204.58.1",
                "configure 148.204.58.1",
                "disconnect 148.204.58.1"
            ]
        );
    }

    #[tokio::test]
    async fn test_walks_full_chain() {
        let walker = walker(chain(), Protocol::Rip, 3);
        let run = walker.run().await.unwrap();

        let addresses: Vec<_> = run.devices.iter().map(|d| d.address.as_str()).collect();
        assert_eq!(addresses, vec!["148.204.58.1", "148.204.58.2", "10.0.23.2"]);
        assert_linear(&run);
        assert_eq!(run.configured_count(), 3);
        assert!(!run.halted());
        assert_eq!(run.results[2].via.as_deref(), Some("148.204.58.2"));
        assert!(run.results[1].output().unwrap().contains("router rip"));
    }

    #[tokio::test]
    async fn test_nested_tunnels_and_teardown_order() {
        let walker = walker(chain(), Protocol::ospf(), 3);
        walker.run().await.unwrap();

        assert_eq!(
            walker.connector().events(),
            vec![
                "connect 148.204.58.1",
                "configure 148.204.58.1",
                "tunnel 148.204.58.1",
                "connect 148.204.58.2 via 148.204.58.1",
                "configure 148.204.58.2",
                "disconnect 148.204.58.1",
                "tunnel 148.204.58.2 via 148.204.58.1",
                "connect 10.0.23.2 via 148.204.58.2",
                "configure 10.0.23.2",
                "disconnect 148.204.58.2",
                "disconnect 10.0.23.2",
                "close tunnel 148.204.58.2",
                "close tunnel 148.204.58.1",
            ]
        );
    }

    #[tokio::test]
    async fn test_halts_without_next_hop() {
        let mut network = chain();
        network.add(
            "148.204.58.1",
            Device {
                brief: "FastEthernet0/0  148.204.58.1  YES  manual  up  up\n".to_string(),
                config: "hostname R1\ninterface FastEthernet0/0\n no ip address\n".to_string(),
                ..Default::default()
            },
        );
        let walker = walker(network, Protocol::ospf(), 3);
        let run = walker.run().await.unwrap();

        assert_eq!(run.devices.len(), 1);
        assert_eq!(run.results.len(), 2);
        assert!(run.results[0].is_success());
        assert_eq!(
            run.results[1].outcome,
            HopOutcome::Halted {
                reason: NO_NEXT_HOP.to_string()
            }
        );
        assert!(run.halted());
        assert_eq!(walker.connector().count("tunnel"), 0);
        assert_released(walker.connector());
    }

    #[tokio::test]
    async fn test_halt_at_hop_k_keeps_k_minus_one_devices() {
        for max_devices in 1..=6 {
            let walker = walker(chain(), Protocol::Rip, max_devices);
            let run = walker.run().await.unwrap();

            // The chain has four devices and nothing past R4.
            let reachable = max_devices.min(4);
            assert_eq!(run.devices.len(), reachable, "max_devices = {max_devices}");
            assert!(run.devices.len() <= max_devices);
            assert!(run.results.len() <= max_devices);
            assert_linear(&run);

            if max_devices > 4 {
                assert_eq!(run.results.len(), 5);
                assert!(matches!(run.results[4].outcome, HopOutcome::Halted { .. }));
            } else {
                assert_eq!(run.results.len(), max_devices);
                assert!(run.results.iter().all(HopResult::is_success));
            }

            let network = walker.connector();
            assert_eq!(network.count("tunnel"), reachable - 1);
            assert_eq!(network.count("close tunnel"), reachable - 1);
            assert_eq!(network.count("disconnect"), reachable);
            assert_released(network);
        }
    }

    #[tokio::test]
    async fn test_seed_unreachable_fails_the_walk() {
        let mut network = chain();
        network.unreachable.insert("148.204.58.1".to_string());
        let walker = walker(network, Protocol::ospf(), 3);

        let Err(err) = walker.run().await else {
            panic!("walk from an unreachable seed succeeded");
        };
        assert!(matches!(
            err,
            Error::Walk(WalkError::SeedUnreachable { ref address, .. }) if address == "148.204.58.1"
        ));
        assert_eq!(walker.connector().events(), vec!["connect 148.204.58.1"]);
    }

    #[tokio::test]
    async fn test_seed_config_failure_stops_walk() {
        let mut network = chain();
        if let Some(seed) = network.devices.get_mut("148.204.58.1") {
            seed.fail_config = true;
        }
        let walker = walker(network, Protocol::ospf(), 3);
        let run = walker.run().await.unwrap();

        assert_eq!(run.devices.len(), 1);
        assert_eq!(run.results.len(), 1);
        assert!(!run.results[0].is_success());
        assert!(run.results[0].reached);
        assert_eq!(walker.connector().count("tunnel"), 0);
        assert_eq!(walker.connector().count("disconnect 148.204.58.1"), 1);
    }

    #[tokio::test]
    async fn test_unreachable_hop_is_recorded_and_cleaned_up() {
        let mut network = chain();
        network.unreachable.insert("148.204.58.2".to_string());
        let walker = walker(network, Protocol::ospf(), 3);
        let run = walker.run().await.unwrap();

        assert_eq!(run.devices.len(), 1);
        assert_eq!(run.results.len(), 2);
        let failed = &run.results[1];
        assert_eq!(failed.label, "R2");
        assert_eq!(failed.address.as_deref(), Some("148.204.58.2"));
        assert_eq!(failed.via.as_deref(), Some("148.204.58.1"));
        assert!(!failed.is_success());
        assert!(!failed.reached);

        let network = walker.connector();
        assert_eq!(network.count("tunnel"), 1);
        assert_eq!(network.count("close tunnel"), 1);
        assert_eq!(network.count("disconnect 148.204.58.1"), 1);
    }

    #[tokio::test]
    async fn test_tunnel_failure_is_recorded() {
        let mut network = chain();
        network.broken_jump_hosts.insert("148.204.58.2".to_string());
        let walker = walker(network, Protocol::ospf(), 3);
        let run = walker.run().await.unwrap();

        assert_eq!(run.devices.len(), 2);
        assert_eq!(run.results.len(), 3);
        assert!(matches!(
            run.results[2].outcome,
            HopOutcome::Failed { ref error } if error.contains("Authentication failed")
        ));
        assert_eq!(run.results[2].address.as_deref(), Some("10.0.23.2"));

        // Only the tunnel that opened gets closed.
        assert_eq!(walker.connector().count("close tunnel"), 1);
        assert_eq!(walker.connector().count("disconnect"), 2);
    }

    #[tokio::test]
    async fn test_discovery_failure_is_recorded() {
        let mut network = chain();
        if let Some(r2) = network.devices.get_mut("148.204.58.2") {
            r2.fail_discovery = true;
        }
        let walker = walker(network, Protocol::Rip, 4);
        let run = walker.run().await.unwrap();

        assert_eq!(run.devices.len(), 2);
        assert_eq!(run.results.len(), 3);
        assert_eq!(run.results[2].address, None);
        assert!(matches!(
            run.results[2].outcome,
            HopOutcome::Failed { ref error } if error.starts_with("next hop discovery failed")
        ));
        assert!(run.halted());

        let network = walker.connector();
        assert_eq!(network.count("tunnel"), 1);
        assert_eq!(network.count("close tunnel"), 1);
        assert_eq!(network.count("disconnect"), 2);
        assert_released(network);
    }

    #[tokio::test]
    async fn test_hop_config_failure_keeps_device() {
        let mut network = chain();
        if let Some(r2) = network.devices.get_mut("148.204.58.2") {
            r2.fail_config = true;
        }
        let walker = walker(network, Protocol::ospf(), 3);
        let run = walker.run().await.unwrap();

        assert_eq!(run.devices.len(), 2);
        assert_eq!(run.results.len(), 2);
        assert!(!run.results[1].is_success());
        assert!(run.results[1].reached);
        assert_eq!(walker.connector().count("disconnect 148.204.58.2"), 1);
        assert_eq!(walker.connector().count("disconnect 148.204.58.1"), 1);
        assert_eq!(walker.connector().count("close tunnel"), 1);
    }

    #[tokio::test]
    async fn test_back_link_listed_first_leads_back() {
        // R2 lists its link to R1 before its link to R3, so the first /30
        // peer it reports is R1 again.
        let mut network = chain();
        network.add(
            "148.204.58.2",
            device(&[
                ("FastEthernet0/0", "148.204.58.2", P30),
                ("FastEthernet0/1", "10.0.23.1", P30),
            ]),
        );
        let walker = walker(network, Protocol::ospf(), 3);
        let run = walker.run().await.unwrap();

        let addresses: Vec<_> = run.devices.iter().map(|d| d.address.as_str()).collect();
        assert_eq!(addresses, vec!["148.204.58.1", "148.204.58.2", "148.204.58.1"]);
        assert_eq!(run.devices[2].jump_via.as_deref(), Some("148.204.58.2"));
        assert_linear(&run);
        assert_eq!(run.configured_count(), 3);

        let network = walker.connector();
        assert_eq!(network.count("configure 148.204.58.1"), 2);
        assert_eq!(network.count("connect 10.0.23.2"), 0);
        assert_released(network);
    }

    #[tokio::test]
    async fn test_every_session_and_tunnel_released_once() {
        let walker = walker(chain(), Protocol::ospf(), 4);
        walker.run().await.unwrap();

        let network = walker.connector();
        assert_eq!(network.count("connect"), 4);
        assert_eq!(network.count("disconnect"), 4);
        assert_eq!(network.count("tunnel"), 3);
        assert_eq!(network.count("close tunnel"), 3);
    }

    #[test]
    fn test_request_validation() {
        assert!(WalkRequest::new("", Protocol::Rip, 3).is_err());
        assert!(WalkRequest::new("10.0.0.1", Protocol::Rip, 0).is_err());
        let request = WalkRequest::new("10.0.0.1", Protocol::Rip, 2).unwrap();
        assert_eq!(request.max_devices(), 2);
    }
}
