use serde::{Deserialize, Serialize};

/// Caller roles, from most to least privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    InstitutionAdmin,
    Teacher,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::InstitutionAdmin => "INSTITUTION_ADMIN",
            Role::Teacher => "TEACHER",
            Role::Guest => "GUEST",
        }
    }

    /// Every role, for exhaustive permission-table checks.
    pub const ALL: [Role; 4] = [
        Role::SuperAdmin,
        Role::InstitutionAdmin,
        Role::Teacher,
        Role::Guest,
    ];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}
