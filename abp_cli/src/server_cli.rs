use std::net::UdpSocket;
use std::path::PathBuf;
use clap::ArgMatches;
use log::info;
use abp_server_lib::config::ServerConfig;
use abp_server_lib::file_sandbox::FileSandbox;
use abp_server_lib::server::Server;
use abp_shared_lib::channel::UdpChannel;
use abp_shared_lib::error::Result;
use abp_shared_lib::helper::sha256_helper::sha256_to_hex_string;
use abp_shared_lib::impairment::FrameKind;
use crate::args;

/// receives a single file, then returns
pub fn server_main(matches: &ArgMatches) -> Result<()> {
    let address = matches.value_of("address").unwrap_or("0.0.0.0");
    let port = args::port(matches);
    let output_dir = PathBuf::from(matches.value_of("output_directory").unwrap_or("."));

    let config = ServerConfig {
        chunk_size: args::chunk_size(matches),
        reack_duplicates: !matches.is_present("no_reack"),
    };
    let simulator = args::simulator(matches, FrameKind::Ack)?;

    let socket = UdpSocket::bind((address, port))?;
    info!("Listening on {}, writing to {}", socket.local_addr()?, output_dir.display());
    let channel = UdpChannel::listen(socket)?;
    let mut server = Server::new(channel, simulator, config)?;

    let (path, report) = server.receive_file(&FileSandbox::new(output_dir))?;
    println!(
        "received {} bytes into {} ({} duplicates, {} corrupted), sha256 {}",
        report.bytes,
        path.display(),
        report.duplicates,
        report.corrupted,
        sha256_to_hex_string(report.digest)
    );
    Ok(())
}
