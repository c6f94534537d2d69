use std::fmt;

use crate::entities::ClassId;

/// Something the user should be told about, e.g. in a toast message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNotification {
    AddressNotResolved { address: String },
    ClassLocationNotResolved { class_id: ClassId, address: String },
    ClassSummaryUnavailable { class_id: ClassId },
}

impl fmt::Display for UserNotification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AddressNotResolved { address } => {
                write!(f, "Please enter a precise address ('{address}' was not found).")
            }
            Self::ClassLocationNotResolved { class_id, address } => {
                write!(
                    f,
                    "The location of class {class_id} ('{address}') could not be found."
                )
            }
            Self::ClassSummaryUnavailable { class_id } => {
                write!(
                    f,
                    "A system error occurred while loading class {class_id}. Please try again later."
                )
            }
        }
    }
}

pub trait UserNotificationGateway {
    fn notify(&self, notification: UserNotification);
}
