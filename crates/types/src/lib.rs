#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for ccbuild
//!
//! This crate provides the chaincode descriptors that platform drivers and
//! the build-context pipeline read from. The pipeline never mutates them.

pub mod chaincode;

pub use chaincode::{ChaincodeDeploymentSpec, ChaincodeId, ChaincodeSpec};
