//! Account payloads.

use serde::Serialize;

use crate::record::{RecordReader, Schema};
use crate::rules::{CountRule, TextRule};

/// Request body for registering a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCreate {
    /// Login email.
    pub email: String,
    /// Display name, 2 to 50 characters.
    pub name: String,
    /// Password, kept exactly as supplied.
    pub password: String,
}

impl Schema for UserCreate {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let email = fields.required("email", TextRule::non_blank());
        let name = fields.required("name", TextRule::text().chars(2, 50));
        let password = fields.required("password", TextRule::verbatim().chars(8, 100));
        Some(Self {
            email: email?,
            name: name?,
            password: password?,
        })
    }
}

/// Request body for updating a service account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    /// Authentication token of the account.
    pub token: String,
    /// Service account name, 2 to 100 characters.
    pub name: String,
    /// New password.
    pub password: String,
    /// Quota of services the account may own.
    pub max_services_count: u64,
}

impl Schema for UserUpdate {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let token = fields.required("token", TextRule::verbatim().chars(32, 255));
        let name = fields.required("name", TextRule::text().chars(2, 100));
        let password = fields.required("password", TextRule::verbatim().chars(8, 100));
        let max_services_count = fields.or("max_services_count", CountRule::between(0, 1000), 0);
        Some(Self {
            token: token?,
            name: name?,
            password: password?,
            max_services_count: max_services_count?,
        })
    }
}
