// The closed action catalogue and its static permission table.
//
// Actions arrive as wire strings and parse into this enum; anything else is
// an unknown action. The permission table and the sensitive-action set are
// exhaustive matches, so adding a variant forces both decisions.

use crate::error::ApiError;
use crate::types::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Super admin
    GetAllTenants,
    CreateTenant,
    // Institution admin
    VerifyPin,
    LockSession,
    GetInstitutionAnalytics,
    GetTeachers,
    CreateTeacher,
    UpdateTeacher,
    DeleteTeacher,
    GetAllStudents,
    CreateStudent,
    UpdateStudent,
    DeleteStudent,
    GetClasses,
    // Any role
    VerifyAuth,
    // Teacher or institution admin with a store
    GetTeacherClasses,
    GetStudentsByClass,
    MarkAttendance,
}

impl Action {
    pub const ALL: [Action; 18] = [
        Action::GetAllTenants,
        Action::CreateTenant,
        Action::VerifyPin,
        Action::LockSession,
        Action::GetInstitutionAnalytics,
        Action::GetTeachers,
        Action::CreateTeacher,
        Action::UpdateTeacher,
        Action::DeleteTeacher,
        Action::GetAllStudents,
        Action::CreateStudent,
        Action::UpdateStudent,
        Action::DeleteStudent,
        Action::GetClasses,
        Action::VerifyAuth,
        Action::GetTeacherClasses,
        Action::GetStudentsByClass,
        Action::MarkAttendance,
    ];

    pub fn parse(name: &str) -> Result<Action, ApiError> {
        match name {
            "getAllTenants" => Ok(Action::GetAllTenants),
            "createTenant" => Ok(Action::CreateTenant),
            "verifyPin" => Ok(Action::VerifyPin),
            "lockSession" => Ok(Action::LockSession),
            "getInstitutionAnalytics" => Ok(Action::GetInstitutionAnalytics),
            "getTeachers" => Ok(Action::GetTeachers),
            "createTeacher" => Ok(Action::CreateTeacher),
            "updateTeacher" => Ok(Action::UpdateTeacher),
            "deleteTeacher" => Ok(Action::DeleteTeacher),
            "getAllStudents" => Ok(Action::GetAllStudents),
            "createStudent" => Ok(Action::CreateStudent),
            "updateStudent" => Ok(Action::UpdateStudent),
            "deleteStudent" => Ok(Action::DeleteStudent),
            "getClasses" => Ok(Action::GetClasses),
            "verifyAuth" => Ok(Action::VerifyAuth),
            "getTeacherClasses" => Ok(Action::GetTeacherClasses),
            "getStudentsByClass" => Ok(Action::GetStudentsByClass),
            "markAttendance" => Ok(Action::MarkAttendance),
            other => Err(ApiError::unknown_action(format!("Unknown action: {}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::GetAllTenants => "getAllTenants",
            Action::CreateTenant => "createTenant",
            Action::VerifyPin => "verifyPin",
            Action::LockSession => "lockSession",
            Action::GetInstitutionAnalytics => "getInstitutionAnalytics",
            Action::GetTeachers => "getTeachers",
            Action::CreateTeacher => "createTeacher",
            Action::UpdateTeacher => "updateTeacher",
            Action::DeleteTeacher => "deleteTeacher",
            Action::GetAllStudents => "getAllStudents",
            Action::CreateStudent => "createStudent",
            Action::UpdateStudent => "updateStudent",
            Action::DeleteStudent => "deleteStudent",
            Action::GetClasses => "getClasses",
            Action::VerifyAuth => "verifyAuth",
            Action::GetTeacherClasses => "getTeacherClasses",
            Action::GetStudentsByClass => "getStudentsByClass",
            Action::MarkAttendance => "markAttendance",
        }
    }

    /// The static (role, action) permission table.
    pub fn permitted_for(&self, role: Role) -> bool {
        match role {
            Role::SuperAdmin => matches!(
                self,
                Action::GetAllTenants | Action::CreateTenant | Action::VerifyAuth
            ),
            Role::InstitutionAdmin => matches!(
                self,
                Action::VerifyPin
                    | Action::LockSession
                    | Action::GetInstitutionAnalytics
                    | Action::GetTeachers
                    | Action::CreateTeacher
                    | Action::UpdateTeacher
                    | Action::DeleteTeacher
                    | Action::GetAllStudents
                    | Action::CreateStudent
                    | Action::UpdateStudent
                    | Action::DeleteStudent
                    | Action::GetClasses
                    | Action::VerifyAuth
                    | Action::GetTeacherClasses
                    | Action::GetStudentsByClass
                    | Action::MarkAttendance
            ),
            Role::Teacher => matches!(
                self,
                Action::VerifyAuth
                    | Action::GetTeacherClasses
                    | Action::GetStudentsByClass
                    | Action::MarkAttendance
            ),
            Role::Guest => matches!(self, Action::VerifyAuth),
        }
    }

    /// Sensitive admin actions run the session-guard gate before their
    /// handler: the caller must hold a PIN-elevated session.
    pub fn is_sensitive(&self) -> bool {
        matches!(
            self,
            Action::GetInstitutionAnalytics
                | Action::GetTeachers
                | Action::CreateTeacher
                | Action::UpdateTeacher
                | Action::DeleteTeacher
                | Action::GetAllStudents
                | Action::CreateStudent
                | Action::UpdateStudent
                | Action::DeleteStudent
                | Action::GetClasses
        )
    }
}
