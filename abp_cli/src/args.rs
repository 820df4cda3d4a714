use std::str::FromStr;
use clap::{value_t, ArgMatches};
use log::LevelFilter;
use abp_shared_lib::error::Result;
use abp_shared_lib::field_types::ChunkSize;
use abp_shared_lib::impairment::{FrameKind, ImpairmentConfig, Simulator};

pub fn log_level(matches: &ArgMatches) -> LevelFilter {
    match matches.occurrences_of("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// parses an optional argument, exits with the clap usage error on invalid input
pub fn optional_value<T: FromStr>(matches: &ArgMatches, name: &str) -> Option<T> {
    if matches.is_present(name) {
        Some(value_t!(matches, name, T).unwrap_or_else(|e| e.exit()))
    } else {
        None
    }
}

pub fn port(matches: &ArgMatches) -> u16 {
    value_t!(matches, "port", u16).unwrap_or_else(|e| e.exit())
}

pub fn chunk_size(matches: &ArgMatches) -> ChunkSize {
    value_t!(matches, "chunk_size", ChunkSize).unwrap_or_else(|e| e.exit())
}

/// `--impair` selects the reference profile, the probability flags override
/// the profile of the frames this endpoint sends
pub fn impairment(matches: &ArgMatches, kind: FrameKind) -> ImpairmentConfig {
    let mut config = if matches.is_present("impair") {
        ImpairmentConfig::reference()
    } else {
        ImpairmentConfig::none()
    };
    let profile = match kind {
        FrameKind::Data => &mut config.data,
        FrameKind::Ack => &mut config.ack,
    };
    if let Some(p) = optional_value(matches, "corrupt_sequence_probability") {
        profile.corrupt_sequence = p;
    }
    if let Some(p) = optional_value(matches, "corrupt_checksum_probability") {
        profile.corrupt_checksum = p;
    }
    if let Some(p) = optional_value(matches, "loss_probability") {
        profile.drop = p;
    }
    if let Some(q) = optional_value(matches, "repeated_loss_probability") {
        profile.drop_after_drop = Some(q);
    }
    if let Some(p) = optional_value(matches, "duplicate_probability") {
        profile.duplicate = p;
    }
    config
}

pub fn simulator(matches: &ArgMatches, kind: FrameKind) -> Result<Simulator> {
    let config = impairment(matches, kind);
    log::debug!("impairment of sent {:?} frames: {:?}", kind, config.profile(kind));
    match optional_value::<u64>(matches, "seed") {
        Some(seed) => Simulator::seeded(config, seed),
        None => Simulator::from_entropy(config),
    }
}
