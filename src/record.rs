//! Instance batch records and their canonical wire serialization order.
//!
//! The remote VaaS service receives instance attributes as multipart text
//! fields. The field order is declared explicitly here rather than derived
//! from struct declaration order so it is a testable constant of the wire
//! protocol.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

/// Number of text fields serialized per instance record.
pub const FORM_FIELD_COUNT: usize = 15;

/// One lab instance to create or delete on the remote service.
///
/// All attributes are plain text. Keys absent from the input JSON default to
/// the empty string; serialization always emits every field, empty or not.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct InstanceRecord {
    /// Name identifying the instance on the service.
    pub instance_name: String,
    /// Owner's first name.
    pub owner_first_name: String,
    /// Owner's last name.
    pub owner_last_name: String,
    /// Owner's email address.
    pub email: String,
    /// Password authorising deletion.
    pub delete_password: String,
    /// Confirmation of the delete password.
    pub conf_delete_password: String,
    /// Management server address.
    pub management_server: String,
    /// Outbound API version (the service spells the field `soutbound`).
    pub soutbound_api_version: String,
    /// Whether to unpair an existing instance first.
    pub unpair_existing: String,
    /// PCE user name.
    pub user: String,
    /// PCE password.
    pub pce_password: String,
    /// Confirmation of the PCE password.
    pub conf_pce_password: String,
    /// Organisation identifier.
    pub org: String,
    /// Login server address.
    pub login_server: String,
    /// Whether to clear an existing instance first.
    pub clear_existing: String,
}

impl InstanceRecord {
    /// Returns all `(field name, value)` pairs in canonical wire order.
    ///
    /// The order matches the field names documented by the remote service and
    /// must stay deterministic; the form builder emits the pairs verbatim.
    #[must_use]
    pub fn form_fields(&self) -> [(&'static str, &str); FORM_FIELD_COUNT] {
        [
            ("instance_name", self.instance_name.as_str()),
            ("owner_first_name", self.owner_first_name.as_str()),
            ("owner_last_name", self.owner_last_name.as_str()),
            ("email", self.email.as_str()),
            ("delete_password", self.delete_password.as_str()),
            ("conf_delete_password", self.conf_delete_password.as_str()),
            ("management_server", self.management_server.as_str()),
            ("soutbound_api_version", self.soutbound_api_version.as_str()),
            ("unpair_existing", self.unpair_existing.as_str()),
            ("user", self.user.as_str()),
            ("pce_password", self.pce_password.as_str()),
            ("conf_pce_password", self.conf_pce_password.as_str()),
            ("org", self.org.as_str()),
            ("login_server", self.login_server.as_str()),
            ("clear_existing", self.clear_existing.as_str()),
        ]
    }
}

/// Errors raised while loading an instance batch file.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum BatchError {
    /// Raised when the batch file cannot be read.
    #[error("cannot read batch file {path}: {message}")]
    Read {
        /// Path that failed to open or read.
        path: Utf8PathBuf,
        /// Operating system error message.
        message: String,
    },
    /// Raised when the batch file is not a valid JSON instance array.
    #[error("cannot parse batch file {path}: {message}")]
    Parse {
        /// Path whose contents failed to parse.
        path: Utf8PathBuf,
        /// Parser error message.
        message: String,
    },
}

/// Loads an instance batch from a JSON array file.
///
/// # Errors
///
/// Returns [`BatchError::Read`] when the file cannot be read and
/// [`BatchError::Parse`] when its contents are not a JSON array of instance
/// records.
pub fn load_batch(path: &Utf8Path) -> Result<Vec<InstanceRecord>, BatchError> {
    let raw = fs::read_to_string(path).map_err(|err| BatchError::Read {
        path: path.to_owned(),
        message: err.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|err| BatchError::Parse {
        path: path.to_owned(),
        message: err.to_string(),
    })
}
