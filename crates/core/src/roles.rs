//! Platform roles.
//!
//! Roles are a closed enum rather than free-form strings so that every
//! authorization decision goes through one comparison site. The string
//! forms must match the `users.role` values seeded by the platform.

/// A user's platform-wide role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    ClubLeader,
    FacultyLeader,
    DeanOfFaculty,
    Deanship,
    Admin,
}

impl Role {
    /// The database / JWT string form of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::ClubLeader => "club_leader",
            Role::FacultyLeader => "faculty_leader",
            Role::DeanOfFaculty => "dean_of_faculty",
            Role::Deanship => "deanship",
            Role::Admin => "admin",
        }
    }

    /// Parse a role from its string form. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "club_leader" => Some(Role::ClubLeader),
            "faculty_leader" => Some(Role::FacultyLeader),
            "dean_of_faculty" => Some(Role::DeanOfFaculty),
            "deanship" => Some(Role::Deanship),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
