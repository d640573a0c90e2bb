//! The capability surface every chaincode platform driver implements

use std::io::Write;

use ccbuild_errors::Error;
use ccbuild_types::ChaincodeDeploymentSpec;

/// Archive handle passed to package writers and platform drivers while a build
/// context is being assembled.
///
/// Entries appended here go straight to the compressed output; nothing is
/// buffered beyond the entry being written.
pub type ContextArchive<'a> = tar::Builder<&'a mut dyn Write>;

/// Exposes the metadata stored in a deployment spec.
///
/// Metadata is presented as the raw bytes of a tar stream whose entries were
/// extracted from the chaincode package.
pub trait MetadataProvider: Send {
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be extracted from the package.
    fn get_metadata_as_tar_entries(&self) -> Result<Vec<u8>, Error>;
}

/// Validates chaincode for one type and contributes its part of the image build.
///
/// Implementations are stateless once registered; the registry shares them
/// across concurrent builds.
pub trait Platform: Send + Sync {
    /// Chaincode type this platform handles; the registry dispatch key.
    fn name(&self) -> &str;

    /// # Errors
    ///
    /// Returns an error if the source path is not acceptable for this type.
    fn validate_path(&self, path: &str) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns an error if the code package is malformed for this type.
    fn validate_code_package(&self, code: &[u8]) -> Result<(), Error>;

    /// Build the code package for the chaincode at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be produced.
    fn get_deployment_payload(&self, path: &str) -> Result<Vec<u8>, Error>;

    /// The base section of the Dockerfile, typically a `FROM` line plus setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot describe its base image.
    fn generate_dockerfile(&self) -> Result<String, Error>;

    /// Append this platform's own entries to an in-progress build context.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry cannot be produced or written.
    fn generate_docker_build(
        &self,
        path: &str,
        code: &[u8],
        archive: &mut ContextArchive<'_>,
    ) -> Result<(), Error>;

    fn get_metadata_provider(&self, spec: &ChaincodeDeploymentSpec) -> Box<dyn MetadataProvider>;
}
