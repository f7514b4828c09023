//! Message schema shared between the strategy panel and the strategy host.

include!(concat!(env!("OUT_DIR"), "/protos/mod.rs"));

pub use protobuf::Message;
