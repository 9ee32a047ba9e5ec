use std::fmt::Display;

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::model::{
    db::{admin::Admin, student::Student},
    mongodb::Id,
};

/// A principal that can authenticate and hold an auth token.
pub trait User {
    /// The rights this kind of principal is granted.
    const RIGHTS: Rights;

    /// The principal's unique ID.
    fn id(&self) -> Id;
}

/// The rights granted by an auth token.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Rights {
    Student = 0,
    Admin = 1,
}

impl Display for Rights {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::Student => "student",
                Self::Admin => "admin",
            }
        )
    }
}

impl User for Student {
    const RIGHTS: Rights = Rights::Student;

    fn id(&self) -> Id {
        self.id
    }
}

impl User for Admin {
    const RIGHTS: Rights = Rights::Admin;

    fn id(&self) -> Id {
        self.id
    }
}
