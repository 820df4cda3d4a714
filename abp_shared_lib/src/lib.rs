#[macro_use]
extern crate num_derive;

pub mod constants;
pub mod times;
pub mod field_types;
pub mod error;
pub mod checksum;
pub mod sequence_bit;
pub mod packet;
pub mod impairment;
pub mod channel;
pub mod helper;
pub mod logger;
