//! Generated types for the `ledgerbench.gateway.v1` protocol.
//!
//! This is a simplified rendition of a ledger gateway, not the Hyperledger
//! Fabric `gateway.Gateway` wire format. See `gateway.proto`.

pub mod ledgerbench {
    pub mod gateway {
        pub mod v1 {
            tonic::include_proto!("ledgerbench.gateway.v1");
        }
    }
}
