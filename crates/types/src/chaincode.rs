//! Chaincode descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a chaincode: where its source lives and what it is called
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChaincodeId {
    #[serde(default)]
    pub path: String,
    pub name: String,
    pub version: String,
}

impl ChaincodeId {
    /// Create a new chaincode ID without a source path
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Attach a source path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

impl fmt::Display for ChaincodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// A chaincode declared against a platform type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeSpec {
    /// Type name used to select the platform driver (e.g. `GOLANG`)
    #[serde(rename = "type")]
    pub chaincode_type: String,
    pub chaincode_id: ChaincodeId,
}

impl ChaincodeSpec {
    #[must_use]
    pub fn new(chaincode_type: impl Into<String>, chaincode_id: ChaincodeId) -> Self {
        Self {
            chaincode_type: chaincode_type.into(),
            chaincode_id,
        }
    }

    /// Source path of the chaincode
    #[must_use]
    pub fn path(&self) -> &str {
        &self.chaincode_id.path
    }
}

/// A chaincode spec together with its packaged code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeDeploymentSpec {
    pub chaincode_spec: ChaincodeSpec,
    #[serde(default)]
    pub code_package: Vec<u8>,
}

impl ChaincodeDeploymentSpec {
    #[must_use]
    pub fn new(chaincode_spec: ChaincodeSpec, code_package: Vec<u8>) -> Self {
        Self {
            chaincode_spec,
            code_package,
        }
    }

    #[must_use]
    pub fn chaincode_type(&self) -> &str {
        &self.chaincode_spec.chaincode_type
    }

    #[must_use]
    pub fn chaincode_id(&self) -> &ChaincodeId {
        &self.chaincode_spec.chaincode_id
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.chaincode_spec.path()
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.code_package
    }
}
