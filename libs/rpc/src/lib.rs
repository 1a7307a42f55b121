//! Checked-in protobuf and gRPC code generated from `proto/`.
//!
//! The files under `src/gen/` are prost/tonic output for `proto/users/v1/users.proto`;
//! regenerate them whenever the `.proto` changes.

pub mod users {
    pub mod v1 {
        include!("gen/users.v1.rs");
    }
}
