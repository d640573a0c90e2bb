//! Shared fixtures for platform registry tests

#![allow(dead_code)]

use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ccbuild_errors::Error;
use ccbuild_platforms::{
    BuildContext, ContextArchive, MetadataProvider, PackageWriter, Platform, TarPackageWriter,
};
use ccbuild_types::{ChaincodeDeploymentSpec, ChaincodeId, ChaincodeSpec};
use flate2::read::GzDecoder;
use tokio::io::AsyncReadExt;

/// Platform driver double with scripted results and call recording
pub struct StubPlatform {
    pub name: String,
    pub base: Result<String, String>,
    pub entries: Vec<(String, Vec<u8>)>,
    pub fail_after_entries: Option<String>,
    pub panic_after_entries: Option<String>,
    pub payload: Result<Vec<u8>, String>,
    pub calls: Arc<AtomicUsize>,
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl StubPlatform {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            base: Ok(format!("FROM {name}-base")),
            entries: Vec::new(),
            fail_after_entries: None,
            panic_after_entries: None,
            payload: Ok(b"payload".to_vec()),
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_entry(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        self.entries.push((name.to_string(), data.into()));
        self
    }

    pub fn failing_after_entries(mut self, message: &str) -> Self {
        self.fail_after_entries = Some(message.to_string());
        self
    }

    pub fn panicking_after_entries(mut self, message: &str) -> Self {
        self.panic_after_entries = Some(message.to_string());
        self
    }

    pub fn with_base(mut self, base: Result<&str, &str>) -> Self {
        self.base = base.map(str::to_string).map_err(str::to_string);
        self
    }

    fn record(&self, call: String) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(call);
    }

    pub fn into_arc(self) -> Arc<dyn Platform> {
        Arc::new(self)
    }
}

impl Platform for StubPlatform {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate_path(&self, path: &str) -> Result<(), Error> {
        self.record(format!("validate_path:{path}"));
        if path.contains("..") {
            return Err(Error::internal(format!("invalid path: {path}")));
        }
        Ok(())
    }

    fn validate_code_package(&self, code: &[u8]) -> Result<(), Error> {
        self.record(format!("validate_code_package:{}", code.len()));
        Ok(())
    }

    fn get_deployment_payload(&self, path: &str) -> Result<Vec<u8>, Error> {
        self.record(format!("get_deployment_payload:{path}"));
        self.payload.clone().map_err(Error::internal)
    }

    fn generate_dockerfile(&self) -> Result<String, Error> {
        self.record("generate_dockerfile".to_string());
        self.base.clone().map_err(Error::internal)
    }

    fn generate_docker_build(
        &self,
        path: &str,
        _code: &[u8],
        archive: &mut ContextArchive<'_>,
    ) -> Result<(), Error> {
        self.record(format!("generate_docker_build:{path}"));
        for (name, data) in &self.entries {
            TarPackageWriter.write(name, data, archive)?;
        }
        if let Some(message) = &self.panic_after_entries {
            panic!("{message}");
        }
        match &self.fail_after_entries {
            Some(message) => Err(Error::internal(message.clone())),
            None => Ok(()),
        }
    }

    fn get_metadata_provider(&self, spec: &ChaincodeDeploymentSpec) -> Box<dyn MetadataProvider> {
        self.record("get_metadata_provider".to_string());
        Box::new(StubMetadata(spec.bytes().to_vec()))
    }
}

pub struct StubMetadata(pub Vec<u8>);

impl MetadataProvider for StubMetadata {
    fn get_metadata_as_tar_entries(&self) -> Result<Vec<u8>, Error> {
        Ok(self.0.clone())
    }
}

pub fn deployment_spec(chaincode_type: &str, name: &str, version: &str) -> ChaincodeDeploymentSpec {
    let id = ChaincodeId::new(name, version).with_path(format!("src/{name}"));
    ChaincodeDeploymentSpec::new(ChaincodeSpec::new(chaincode_type, id), b"code".to_vec())
}

/// Drain a build context, returning the bytes read and the terminal error
pub async fn read_context(mut context: BuildContext) -> (Vec<u8>, Option<std::io::Error>) {
    let mut buf = Vec::new();
    let err = context.read_to_end(&mut buf).await.err();
    (buf, err)
}

/// Decode gzip-compressed tar bytes into (name, content) pairs in archive order
pub fn unpack(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    archive
        .entries()
        .unwrap()
        .map(|entry| {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().display().to_string();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            (name, data)
        })
        .collect()
}

/// Deterministic bytes that gzip cannot shrink
pub fn incompressible(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state.to_le_bytes()[0]
        })
        .collect()
}
