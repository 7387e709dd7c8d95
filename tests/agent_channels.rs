//! End-to-end tests over real TCP connections.

use std::time::Duration;

use agent_check::client::{self, Report};
use agent_check::config::ChannelConfig;
use agent_check::lifecycle::{self, Shutdown};
use agent_check::net::ListenerError;
use agent_check::state::{OperationalState, SetOutcome, StateStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

mod common;

async fn raw_exchange(addr: std::net::SocketAddr, input: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(input).await.unwrap();
    let mut reply = String::new();
    stream.read_to_string(&mut reply).await.unwrap();
    reply
}

#[tokio::test]
async fn report_starts_up() {
    let (agent, _store, _shutdown) = common::start_agent(87).await;

    let mut stream = TcpStream::connect(agent.report_addr).await.unwrap();
    let mut line = String::new();
    stream.read_to_string(&mut line).await.unwrap();

    assert_eq!(line, "UP 87% \n");
}

#[tokio::test]
async fn drain_then_report() {
    let (agent, _store, _shutdown) = common::start_agent(40).await;

    assert_eq!(raw_exchange(agent.control_addr, b"drain\n").await, "DRAIN OK\n");

    let report = client::fetch_report(agent.report_addr).await.unwrap();
    assert_eq!(
        report,
        Report {
            state: OperationalState::Drain,
            idle_percent: 40
        }
    );
}

#[tokio::test]
async fn bogus_state_leaves_up() {
    let (agent, store, _shutdown) = common::start_agent(10).await;

    assert_eq!(raw_exchange(agent.control_addr, b"bogus\n").await, "NOT SET\n");

    let report = client::fetch_report(agent.report_addr).await.unwrap();
    assert_eq!(report.state, OperationalState::Up);
    assert_eq!(store.get(), OperationalState::Up);
}

#[tokio::test]
async fn disconnect_without_newline_gets_no_reply() {
    let (agent, store, _shutdown) = common::start_agent(10).await;
    store.set("ready");

    let mut stream = TcpStream::connect(agent.control_addr).await.unwrap();
    stream.write_all(b"down").await.unwrap();
    stream.shutdown().await.unwrap();

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).await.unwrap();

    assert!(reply.is_empty());
    assert_eq!(store.get(), OperationalState::Ready);
}

#[tokio::test]
async fn overlapping_writers_leave_one_state() {
    let (agent, store, _shutdown) = common::start_agent(10).await;

    let (maint, down) = tokio::join!(
        client::send_state(agent.control_addr, "maint"),
        client::send_state(agent.control_addr, "down"),
    );
    assert_eq!(maint.unwrap(), SetOutcome::Applied(OperationalState::Maint));
    assert_eq!(down.unwrap(), SetOutcome::Applied(OperationalState::Down));

    let final_state = store.get();
    assert!(matches!(final_state, OperationalState::Maint | OperationalState::Down));

    let report = client::fetch_report(agent.report_addr).await.unwrap();
    assert_eq!(report.state, final_state);
}

#[tokio::test]
async fn idle_control_client_does_not_block_others() {
    let (agent, _store, _shutdown) = common::start_agent(55).await;

    // Holds a control connection open without ever sending a newline.
    let mut idle = TcpStream::connect(agent.control_addr).await.unwrap();
    idle.write_all(b"dr").await.unwrap();

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        client::send_state(agent.control_addr, "failed"),
    )
    .await
    .expect("second control client blocked")
    .unwrap();
    assert_eq!(outcome, SetOutcome::Applied(OperationalState::Failed));

    let report = tokio::time::timeout(Duration::from_secs(5), client::fetch_report(agent.report_addr))
        .await
        .expect("report blocked by idle control client")
        .unwrap();
    assert_eq!(report.state, OperationalState::Failed);
    assert_eq!(report.idle_percent, 55);
}

#[tokio::test]
async fn many_concurrent_reports() {
    let (agent, store, _shutdown) = common::start_agent(99).await;
    store.set("stopped");

    let reports: Vec<_> = (0..32)
        .map(|_| tokio::spawn(client::fetch_report(agent.report_addr)))
        .collect();

    for report in reports {
        let report = report.await.unwrap().unwrap();
        assert_eq!(report.state, OperationalState::Stopped);
        assert_eq!(report.idle_percent, 99);
    }
}

#[tokio::test]
async fn shutdown_closes_both_channels() {
    let (agent, _store, shutdown) = common::start_agent(1).await;
    let report_addr = agent.report_addr;
    let control_addr = agent.control_addr;

    shutdown.trigger();
    let exit = agent.join().await.unwrap();
    assert!(exit.report.is_ok());
    assert!(exit.control.is_ok());

    assert!(TcpStream::connect(report_addr).await.is_err());
    assert!(TcpStream::connect(control_addr).await.is_err());
}

#[tokio::test]
async fn occupied_control_address_fails_startup() {
    let (agent, _store, _shutdown) = common::start_agent(1).await;

    let mut config = common::loopback_config();
    config.control = ChannelConfig::new(agent.control_addr.to_string());

    let err = lifecycle::start(&config, &Shutdown::new()).await.unwrap_err();
    assert!(matches!(err, ListenerError::Bind { .. }));
}

#[tokio::test]
async fn system_sampler_measures_each_report_over_the_window() {
    let config = common::loopback_config();
    let shutdown = Shutdown::new();
    let agent = lifecycle::start(&config, &shutdown).await.unwrap();

    for _ in 0..2 {
        let started = std::time::Instant::now();
        let report = client::fetch_report(agent.report_addr).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert_eq!(report.state, OperationalState::Up);
        assert!(report.idle_percent <= 100);
    }
}
