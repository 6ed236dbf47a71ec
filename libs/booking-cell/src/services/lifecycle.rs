use crate::models::{AppointmentStatus, BookingError};

/// Appointment state machine. `cancelled` is terminal; `confirmed` can only
/// still be cancelled. Re-asserting the current status is not a transition.
pub fn can_transition(from: AppointmentStatus, to: AppointmentStatus) -> bool {
    use AppointmentStatus::*;
    matches!(
        (from, to),
        (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled)
    )
}

pub fn check_transition(
    from: AppointmentStatus,
    to: AppointmentStatus,
) -> Result<(), BookingError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(BookingError::InvalidTransition { from, to })
    }
}

/// Parse a client-supplied status string, rejecting anything outside the
/// known set with a 400.
pub fn parse_status(raw: &str) -> Result<AppointmentStatus, BookingError> {
    raw.parse()
        .map_err(|_| BookingError::ValidationError("Invalid status value".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppointmentStatus::*;

    #[test]
    fn test_valid_transitions() {
        assert!(can_transition(Pending, Confirmed));
        assert!(can_transition(Pending, Cancelled));
        assert!(can_transition(Confirmed, Cancelled));
    }

    #[test]
    fn test_cancelled_is_terminal() {
        assert!(!can_transition(Cancelled, Pending));
        assert!(!can_transition(Cancelled, Confirmed));
        assert!(!can_transition(Cancelled, Cancelled));
    }

    #[test]
    fn test_no_reopening_or_self_transitions() {
        assert!(!can_transition(Confirmed, Pending));
        assert!(!can_transition(Confirmed, Confirmed));
        assert!(!can_transition(Pending, Pending));
    }

    #[test]
    fn test_check_transition_reports_both_states() {
        let err = check_transition(Cancelled, Confirmed).unwrap_err();
        match err {
            BookingError::InvalidTransition { from, to } => {
                assert_eq!(from, Cancelled);
                assert_eq!(to, Confirmed);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("confirmed").unwrap(), Confirmed);
        assert!(parse_status("approved").is_err());
        assert!(parse_status("CONFIRMED").is_err());
    }
}
