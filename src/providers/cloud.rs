//! Cloud ASG interface (spec §6): `describe_asgs`/`set_desired_capacity`.

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ASGInfo {
    pub name: String,
    pub min: i64,
    pub max: i64,
    pub desired: i64,
    pub azs: Vec<String>,
}

/// Capability set {`describe_asgs`, `set_desired_capacity`} (spec §6).
/// The provider guarantees `min <= desired <= max` and rejects values
/// outside that band; the core clamps before ever calling `set_desired_capacity`.
pub trait CloudAsgClient {
    /// Describes all ASGs, or only the named ones if `names` is `Some`.
    fn describe_asgs(&self, names: Option<&[String]>) -> Result<Vec<ASGInfo>, CoreError>;

    fn set_desired_capacity(&self, name: &str, value: i64) -> Result<(), CoreError>;
}
