//! Dispatch table routing chaincode operations to platform drivers

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ccbuild_config::{Config, RecipeConfig, StreamConfig};
use ccbuild_errors::{Error, PlatformError};
use ccbuild_events::{EventEmitter, EventSender, PlatformEvent};
use ccbuild_types::{ChaincodeDeploymentSpec, ChaincodeSpec};

use crate::dockerfile::assemble_dockerfile;
use crate::platform::{MetadataProvider, Platform};
use crate::writer::{PackageWriter, TarPackageWriter};

/// Maps chaincode type names to their platform drivers.
///
/// Built once at startup and shared by reference afterwards; every operation
/// takes `&self`, so concurrent dispatch needs no locking.
pub struct Registry {
    pub(crate) platforms: HashMap<String, Arc<dyn Platform>>,
    pub(crate) package_writer: Arc<dyn PackageWriter>,
    pub(crate) recipe: RecipeConfig,
    pub(crate) stream: StreamConfig,
    pub(crate) event_sender: Option<EventSender>,
}

impl Registry {
    /// Create a registry from a set of platforms.
    ///
    /// # Errors
    ///
    /// Returns `DuplicatePlatformName` if two platforms report the same name.
    pub fn new<I>(platforms: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Arc<dyn Platform>>,
    {
        let mut by_name: HashMap<String, Arc<dyn Platform>> = HashMap::new();
        for platform in platforms {
            let name = platform.name().to_string();
            if by_name.contains_key(&name) {
                return Err(PlatformError::DuplicatePlatformName { name }.into());
            }
            by_name.insert(name, platform);
        }

        Ok(Self {
            platforms: by_name,
            package_writer: Arc::new(TarPackageWriter),
            recipe: RecipeConfig::default(),
            stream: StreamConfig::default(),
            event_sender: None,
        })
    }

    /// Use recipe metadata and stream tuning from `config`
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        self.recipe = config.recipe.clone();
        self.stream = config.stream.clone();
        self
    }

    /// Replace the writer used for static build-context entries
    #[must_use]
    pub fn with_package_writer(mut self, writer: impl PackageWriter + 'static) -> Self {
        self.package_writer = Arc::new(writer);
        self
    }

    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Registered type names, sorted
    #[must_use]
    pub fn platform_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.platforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn contains(&self, platform_type: &str) -> bool {
        self.platforms.contains_key(platform_type)
    }

    pub(crate) fn platform(&self, platform_type: &str) -> Result<&Arc<dyn Platform>, Error> {
        self.platforms.get(platform_type).ok_or_else(|| {
            PlatformError::UnknownPlatformType {
                platform_type: platform_type.to_string(),
            }
            .into()
        })
    }

    /// Validate the source path of a chaincode spec.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlatformType` for unregistered types, otherwise the
    /// platform's own validation error.
    pub fn validate_spec(&self, spec: &ChaincodeSpec) -> Result<(), Error> {
        self.platform(&spec.chaincode_type)?.validate_path(spec.path())
    }

    /// Validate the code package of a deployment spec.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlatformType` for unregistered types, otherwise the
    /// platform's own validation error.
    pub fn validate_deployment_spec(&self, cds: &ChaincodeDeploymentSpec) -> Result<(), Error> {
        self.platform(cds.chaincode_type())?.validate_code_package(cds.bytes())
    }

    /// # Errors
    ///
    /// Returns `UnknownPlatformType` for unregistered types.
    pub fn get_metadata_provider(
        &self,
        cds: &ChaincodeDeploymentSpec,
    ) -> Result<Box<dyn MetadataProvider>, Error> {
        Ok(self
            .platform(cds.chaincode_type())?
            .get_metadata_provider(cds))
    }

    /// # Errors
    ///
    /// Returns `UnknownPlatformType` for unregistered types, otherwise whatever
    /// the platform fails with while building the payload.
    pub fn get_deployment_payload(&self, spec: &ChaincodeSpec) -> Result<Vec<u8>, Error> {
        self.platform(&spec.chaincode_type)?.get_deployment_payload(spec.path())
    }

    /// Generate the Dockerfile for a deployment spec.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlatformType` for unregistered types and
    /// `GenerationError` if the platform cannot produce its base section.
    pub fn generate_dockerfile(&self, cds: &ChaincodeDeploymentSpec) -> Result<String, Error> {
        let platform = self.platform(cds.chaincode_type())?;

        let base = platform
            .generate_dockerfile()
            .map_err(|e| PlatformError::GenerationError {
                platform_type: cds.chaincode_type().to_string(),
                message: e.to_string(),
            })?;

        let contents = assemble_dockerfile(&base, cds, &self.recipe);
        tracing::debug!("\n{contents}");

        self.emit_platform(PlatformEvent::DockerfileGenerated {
            platform_type: cds.chaincode_type().to_string(),
            chaincode: cds.chaincode_id().to_string(),
            lines: contents.lines().count(),
        });

        Ok(contents)
    }
}

impl EventEmitter for Registry {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("platforms", &self.platform_names())
            .field("recipe", &self.recipe)
            .field("stream", &self.stream)
            .finish_non_exhaustive()
    }
}
