//! Dockerfile assembly
//!
//! The platform supplies the base section; everything after it is fixed
//! metadata in a fixed order. Image hashes depend on this text, so identical
//! inputs must yield identical bytes.

use ccbuild_config::{constants::BUILD_LEVEL_ENV, RecipeConfig};
use ccbuild_types::ChaincodeDeploymentSpec;

/// Append the metadata directives to a platform's base section.
#[must_use]
pub fn assemble_dockerfile(
    base: &str,
    cds: &ChaincodeDeploymentSpec,
    recipe: &RecipeConfig,
) -> String {
    let prefix = &recipe.label_prefix;
    let id = cds.chaincode_id();

    let lines = [
        base.to_string(),
        format!("LABEL {prefix}.chaincode.id.name=\"{}\" \\", id.name),
        format!("      {prefix}.chaincode.id.version=\"{}\" \\", id.version),
        format!("      {prefix}.chaincode.type=\"{}\" \\", cds.chaincode_type()),
        format!("      {prefix}.version=\"{}\" \\", recipe.version),
        format!("      {prefix}.base.version=\"{}\"", recipe.base_version),
        // Lets peers compare the chaincode build level against their own
        format!("ENV {BUILD_LEVEL_ENV}={}", recipe.version),
    ];

    lines.join("\n")
}
