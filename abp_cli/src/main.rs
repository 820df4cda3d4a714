mod server_cli;
mod client_cli;
mod args;

use std::process;
use clap::{Arg, App};
use crate::server_cli::server_main;
use crate::client_cli::client_main;
use crate::args::log_level;

fn app() -> App<'static, 'static> {
    App::new("ABP File Transfer CLI")
        .version("1.0")
        .about("Alternating bit file transfer over UDP, client & server")
        .arg(
            Arg::with_name("server")
                .short("s")
                .long("server")
                .help("Receive a single file instead of sending one")
                .takes_value(false)
        )
        .arg(
            Arg::with_name("address")
                .short("a")
                .long("address")
                .value_name("IP/HOSTNAME")
                .help("Client: the host to send to; Server: the address to bind (default 0.0.0.0)")
                .required_unless("server")
                .takes_value(true)
        )
        .arg(
            Arg::with_name("port")
                .short("t")
                .long("port")
                .value_name("PORT")
                .help("The UDP port to be used")
                .default_value("9840")
                .takes_value(true)
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Sets the level of verbosity (''=warn, 'v'=info, 'vv'=debug, 'vvv'=trace)")
                .takes_value(false)
        )
        .arg(
            Arg::with_name("file")
                .short("f")
                .long("file")
                .value_name("FILE")
                .help("The file to send")
                .conflicts_with("server")
                .required_unless("server")
                .takes_value(true)
        )
        .arg(
            Arg::with_name("name")
                .short("n")
                .long("name")
                .value_name("NAME")
                .help("The name the server stores the file under, defaults to the file name of FILE")
                .conflicts_with("server")
                .takes_value(true)
        )
        .arg(
            Arg::with_name("output_directory")
                .short("d")
                .long("directory")
                .value_name("PATH")
                .help("The directory the server writes the received file to")
                .default_value_if("server", None, ".")
                .requires("server")
                .takes_value(true)
        )
        .arg(
            Arg::with_name("chunk_size")
                .short("c")
                .long("chunk-size")
                .value_name("BYTES")
                .help("Payload bytes per frame, must be the same on both sides")
                .default_value("10")
                .takes_value(true)
        )
        .arg(
            Arg::with_name("timeout")
                .long("timeout")
                .value_name("MILLISECONDS")
                .help("Client: how long to wait for an acknowledgment (default 1000.5 ms)")
                .conflicts_with("server")
                .takes_value(true)
        )
        .arg(
            Arg::with_name("retries")
                .short("r")
                .long("retries")
                .value_name("COUNT")
                .help("Client: retransmissions per chunk before giving up (default 100)")
                .conflicts_with_all(&["server", "unlimited_retries"])
                .takes_value(true)
        )
        .arg(
            Arg::with_name("unlimited_retries")
                .long("unlimited-retries")
                .help("Client: never give up on a chunk")
                .conflicts_with("server")
                .takes_value(false)
        )
        .arg(
            Arg::with_name("no_reack")
                .long("no-reack")
                .help("Server: do not acknowledge duplicate frames again")
                .requires("server")
                .takes_value(false)
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed for the impairment simulation, random if omitted")
                .takes_value(true)
        )
        .arg(
            Arg::with_name("impair")
                .long("impair")
                .help("Impairment simulation with the reference profile (data: 20% corrupted sequence, 20% corrupted checksum, 30% loss, 30% duplication; acks: 30% loss, 30% duplication)")
                .takes_value(false)
        )
        .arg(
            Arg::with_name("corrupt_sequence_probability")
                .long("corrupt-sequence")
                .value_name("PROBABILITY")
                .help("Impairment simulation; The probability that the sequence field of a sent frame is corrupted")
                .takes_value(true)
        )
        .arg(
            Arg::with_name("corrupt_checksum_probability")
                .long("corrupt-checksum")
                .value_name("PROBABILITY")
                .help("Impairment simulation; The probability that the checksum field of a sent frame is corrupted")
                .takes_value(true)
        )
        .arg(
            Arg::with_name("loss_probability")
                .short("p")
                .value_name("PROBABILITY")
                .help("Impairment simulation; The probability that a sent frame is lost")
                .takes_value(true)
        )
        .arg(
            Arg::with_name("repeated_loss_probability")
                .short("q")
                .value_name("PROBABILITY")
                .help("Impairment simulation; The probability that a sent frame is lost if the previous frame was also lost")
                .takes_value(true)
        )
        .arg(
            Arg::with_name("duplicate_probability")
                .long("duplicate")
                .value_name("PROBABILITY")
                .help("Impairment simulation; The probability that a sent frame is sent twice")
                .takes_value(true)
        )
}

fn main() {
    let matches = app().get_matches();

    env_logger::builder().filter_level(log_level(&matches)).init();

    let result = if matches.is_present("server") {
        server_main(&matches)
    } else {
        client_main(&matches)
    };

    if let Err(e) = result {
        eprintln!("abp: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use crate::app;

    #[test]
    fn client_requires_address_and_file() {
        assert!(app().get_matches_from_safe(vec!["abp"]).is_err());
        assert!(app().get_matches_from_safe(vec!["abp", "-a", "127.0.0.1"]).is_err());
        assert!(app().get_matches_from_safe(vec!["abp", "-a", "127.0.0.1", "-f", "in.txt"]).is_ok());
    }

    #[test]
    fn server_defaults_to_current_directory() {
        let matches = app().get_matches_from(vec!["abp", "-s"]);
        assert_eq!(matches.value_of("output_directory"), Some("."));
        assert_eq!(matches.value_of("port"), Some("9840"));
    }

    #[test]
    fn server_rejects_client_flags() {
        assert!(app().get_matches_from_safe(vec!["abp", "-s", "-f", "in.txt"]).is_err());
        assert!(app().get_matches_from_safe(vec!["abp", "-s", "--timeout", "10"]).is_err());
    }
}
