#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Chaincode platform dispatch and build-context assembly
//!
//! Platform drivers implement [`Platform`] for one chaincode type each. A
//! [`Registry`] routes validation, payload and Dockerfile operations to the
//! right driver, and [`Registry::generate_docker_build`] streams the
//! gzip-compressed tar build context an image build consumes: `Dockerfile`
//! first, then whatever the driver contributes.

pub mod dockerfile;
pub mod platform;
pub mod registry;
pub mod stream;
pub mod writer;

pub use dockerfile::assemble_dockerfile;
pub use platform::{ContextArchive, MetadataProvider, Platform};
pub use registry::Registry;
pub use stream::{BuildContext, DOCKERFILE};
pub use writer::{PackageWriter, TarPackageWriter, ENTRY_MODE};
