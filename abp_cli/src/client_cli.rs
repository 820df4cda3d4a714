use std::fs::File;
use std::io::{self, BufReader};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::path::Path;
use std::time::Duration;
use clap::ArgMatches;
use log::info;
use abp_client_lib::client::Client;
use abp_client_lib::config::ClientConfig;
use abp_shared_lib::channel::UdpChannel;
use abp_shared_lib::error::{ErrorType, Result};
use abp_shared_lib::helper::sha256_helper::sha256_to_hex_string;
use abp_shared_lib::impairment::FrameKind;
use crate::args;

pub fn client_main(matches: &ArgMatches) -> Result<()> {
    let host = matches.value_of("address").unwrap_or_default();
    let port = args::port(matches);
    let file_path = Path::new(matches.value_of("file").unwrap_or_default());
    let name = match matches.value_of("name") {
        Some(name) => name.to_string(),
        None => file_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ErrorType::InvalidFileName(file_path.display().to_string()))?
            .to_string(),
    };

    let mut config = ClientConfig {
        chunk_size: args::chunk_size(matches),
        ..ClientConfig::default()
    };
    if let Some(millis) = args::optional_value::<u64>(matches, "timeout") {
        config.ack_timeout = Duration::from_millis(millis);
    }
    if matches.is_present("unlimited_retries") {
        config.max_retransmissions = None;
    } else if let Some(retries) = args::optional_value::<u32>(matches, "retries") {
        config.max_retransmissions = Some(retries);
    }

    let peer = resolve(host, port)?;
    let socket = UdpSocket::bind(if peer.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" })?;
    let channel = UdpChannel::connect(socket, peer)?;
    let simulator = args::simulator(matches, FrameKind::Data)?;
    let mut client = Client::new(channel, simulator, config)?;

    let source = File::open(file_path)?;
    info!("Sending {} to {} as {}", file_path.display(), peer, name);
    let report = client.transfer(&name, BufReader::new(source))?;
    println!(
        "sent {} bytes in {} chunks ({} retransmissions), sha256 {}",
        report.bytes,
        report.chunks,
        report.retransmissions,
        sha256_to_hex_string(report.digest)
    );
    Ok(())
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| ErrorType::IOError(io::Error::new(
            io::ErrorKind::NotFound,
            format!("could not resolve {}", host)
        )))
}
